use std::collections::HashSet;

use crate::domain::entities::verification_code::{CODE_MAX, CODE_MIN};
use crate::services::verification::generator::RandomCodeGenerator;
use crate::services::verification::traits::CodeGenerator;

#[test]
fn test_generated_codes_are_four_digits_in_range() {
    let generator = RandomCodeGenerator;

    for _ in 0..1000 {
        let code = generator.generate();
        assert!(code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit()), "malformed code {}", code);

        let value: u32 = code.parse().unwrap();
        assert!((CODE_MIN..=CODE_MAX).contains(&value));
    }
}

#[test]
fn test_generated_codes_vary() {
    let generator = RandomCodeGenerator;
    let distinct: HashSet<String> = (0..200).map(|_| generator.generate()).collect();

    // 200 draws from 9000 values collide heavily only if the source is broken
    assert!(distinct.len() > 150);
}
