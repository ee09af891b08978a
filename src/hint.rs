//! Guess evaluation and the canned hint table.
//!
//! Matching is a case-insensitive exact comparison: "Ohio State" and
//! "Ohio State University" are different answers.

/// Feedback recorded for a correct guess.
pub const CORRECT_FEEDBACK: &str = "Correct!";

const REGIONS: &[(&str, &str)] = &[
  ("harvard university", "northeast"),
  ("stanford university", "west"),
  ("university of michigan", "midwest"),
];

pub fn is_correct_guess(guess: &str, answer: &str) -> bool {
  guess.to_lowercase() == answer.to_lowercase()
}

fn region_of(college_lower: &str) -> Option<&'static str> {
  REGIONS
    .iter()
    .find(|(name, _)| *name == college_lower)
    .map(|(_, region)| *region)
}

/// Hint for an incorrect guess.
pub fn generate_hint(guess: &str, answer: &str) -> String {
  let guess = guess.to_lowercase();
  let answer = answer.to_lowercase();

  if guess.contains("university") && answer.contains("university") {
    return "You're on the right track with a university.".into();
  }
  if guess.contains("college") && answer.contains("college") {
    return "You're on the right track with a college.".into();
  }

  if let (Some(g), Some(a)) = (region_of(&guess), region_of(&answer)) {
    return if g == a {
      "You're looking in the right region!".into()
    } else {
      "Try looking in a different region.".into()
    };
  }

  "That's not it. Try another college.".into()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn equality_ignores_case_only() {
    assert!(is_correct_guess("ohio state", "Ohio State"));
    assert!(is_correct_guess("DUKE UNIVERSITY", "Duke University"));
    assert!(!is_correct_guess("Ohio State", "Ohio State University"));
    assert!(!is_correct_guess(" Duke University", "Duke University"));
  }

  #[test]
  fn university_hint_wins_over_region() {
    let hint = generate_hint("Harvard University", "Stanford University");
    assert_eq!(hint, "You're on the right track with a university.");
  }

  #[test]
  fn college_hint() {
    let hint = generate_hint("Boston College", "Davidson College");
    assert_eq!(hint, "You're on the right track with a college.");
  }

  #[test]
  fn default_hint_when_nothing_matches() {
    assert_eq!(
      generate_hint("Gonzaga", "Davidson College"),
      "That's not it. Try another college."
    );
  }

  #[test]
  fn region_lookup_needs_both_sides() {
    // Every region entry also contains "university", so the table is checked directly.
    assert_eq!(region_of("harvard university"), Some("northeast"));
    assert_eq!(region_of("stanford university"), Some("west"));
    assert_eq!(region_of("gonzaga"), None);
  }
}
