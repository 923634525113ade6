use crate::engine::types::Grade;

/// Converts a composite score (0–100) into a letter grade.
///
/// | Range        | Grade |
/// |--------------|-------|
/// | >= 80        | E     |
/// | >= 60        | D     |
/// | >= 40        | C     |
/// | >= 20        | B     |
/// | < 20         | A     |
///
/// Scores outside `[0, 100]` cannot come out of the aggregator and trip a
/// debug assertion.
pub fn grade(score: f64) -> Grade {
    debug_assert!(
        (0.0..=100.0).contains(&score),
        "composite score {score} outside [0, 100]"
    );

    match score {
        s if s >= 80.0 => Grade::E,
        s if s >= 60.0 => Grade::D,
        s if s >= 40.0 => Grade::C,
        s if s >= 20.0 => Grade::B,
        _ => Grade::A,
    }
}
