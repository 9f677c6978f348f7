#![no_main]

use libfuzzer_sys::fuzz_target;
use loglog_counter::Estimator;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let precision = 4 + (wyhash(data, 0) % 13) as u8;
    let mut estimator = Estimator::new(precision).unwrap();
    let text = String::from_utf8_lossy(data);

    let mut prev = estimator.registers().to_vec();
    for key in text.split(|c: char| c == '\n' || c == '\0') {
        estimator.update(key);

        let curr = estimator.registers();
        assert!(prev.iter().zip(curr).all(|(p, c)| p <= c));
        assert!(curr.iter().all(|&r| u32::from(r) <= 33 - u32::from(precision)));

        let estimate = estimator.estimate();
        // large range correction is undefined once raw estimate reaches 2^32
        assert!(estimate.is_nan() || estimate > 0.0);
        assert_eq!(estimate.to_bits(), estimator.estimate().to_bits());

        prev = curr.to_vec();
    }
});
