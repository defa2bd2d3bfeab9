use crate::models::{FormAnswers, Participant};

/// Lower-case a gender answer and fold its synonyms
pub fn normalize_gender(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "man" => "male".to_string(),
        "woman" => "female".to_string(),
        "non-binary" | "nonbinary" => "non_binary".to_string(),
        _ => value,
    }
}

/// Lower-case an `interested_in` answer and fold its synonyms
pub fn normalize_preference(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "men" => "male".to_string(),
        "women" => "female".to_string(),
        _ => value,
    }
}

#[inline]
fn accepts(preference: &str, gender: &str) -> bool {
    preference == "everyone" || preference == gender
}

/// Mutual preference check over two sets of form answers
///
/// Missing gender or preference on either side is treated as compatible so
/// optional fields never block a pairing.
pub fn answers_compatible(a: &FormAnswers, b: &FormAnswers) -> bool {
    let (Some(gender_a), Some(pref_a), Some(gender_b), Some(pref_b)) =
        (a.gender(), a.interested_in(), b.gender(), b.interested_in())
    else {
        return true;
    };

    let gender_a = normalize_gender(gender_a);
    let gender_b = normalize_gender(gender_b);
    let pref_a = normalize_preference(pref_a);
    let pref_b = normalize_preference(pref_b);

    accepts(&pref_a, &gender_b) && accepts(&pref_b, &gender_a)
}

/// Whether two participants may be paired
#[inline]
pub fn is_compatible(p1: &Participant, p2: &Participant) -> bool {
    answers_compatible(&p1.form_answers, &p2.form_answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(gender: Option<&str>, interested_in: Option<&str>) -> FormAnswers {
        let mut answers = FormAnswers::new();
        if let Some(g) = gender {
            answers.insert("gender", g);
        }
        if let Some(i) = interested_in {
            answers.insert("interested_in", i);
        }
        answers
    }

    #[test]
    fn test_mutual_preference() {
        let man = answers(Some("male"), Some("female"));
        let woman = answers(Some("female"), Some("male"));
        assert!(answers_compatible(&man, &woman));
        assert!(answers_compatible(&woman, &man));
    }

    #[test]
    fn test_one_sided_interest_is_rejected() {
        let man = answers(Some("male"), Some("female"));
        let woman = answers(Some("female"), Some("female"));
        assert!(!answers_compatible(&man, &woman));
        assert!(!answers_compatible(&woman, &man));
    }

    #[test]
    fn test_synonyms_and_case() {
        let a = answers(Some("Man"), Some("Women"));
        let b = answers(Some("WOMAN"), Some("men"));
        assert!(answers_compatible(&a, &b));
    }

    #[test]
    fn test_padding_and_spelling_variants() {
        assert_eq!(normalize_gender("  Non-Binary "), "non_binary");
        assert_eq!(normalize_gender("nonbinary"), "non_binary");
        assert_eq!(normalize_preference(" Women"), "female");

        // Blank answers count as missing, so they never block a pair
        let blank = answers(Some("   "), Some("male"));
        let woman = answers(Some("female"), Some("female"));
        assert!(answers_compatible(&blank, &woman));
    }

    #[test]
    fn test_everyone_accepts_any_gender() {
        let a = answers(Some("non_binary"), Some("everyone"));
        let b = answers(Some("female"), Some("everyone"));
        let c = answers(Some("male"), Some("female"));
        assert!(answers_compatible(&a, &b));
        // c does not want non_binary
        assert!(!answers_compatible(&a, &c));
    }

    #[test]
    fn test_missing_data_is_permissive() {
        let full = answers(Some("male"), Some("male"));
        let no_pref = answers(Some("female"), None);
        let empty = FormAnswers::new();
        assert!(answers_compatible(&full, &no_pref));
        assert!(answers_compatible(&no_pref, &full));
        assert!(answers_compatible(&empty, &full));
    }
}
