use std::collections::BTreeSet;

use crate::Note;

/// Every distinct tag across `notes`, sorted lexicographically.
pub fn all_tags(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|note| note.tags.iter())
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteDraft;

    fn tagged(id: &str, tags: &[&str]) -> Note {
        Note::from_draft(
            id.to_string(),
            NoteDraft::new(id, "c").with_tags(tags.iter().copied()),
            0,
        )
    }

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let notes = vec![
            tagged("1", &["work", "ideas"]),
            tagged("2", &["home", "work"]),
            tagged("3", &[]),
        ];
        assert_eq!(all_tags(&notes), vec!["home", "ideas", "work"]);
    }

    #[test]
    fn tags_are_case_sensitive() {
        let notes = vec![tagged("1", &["Work"]), tagged("2", &["work"])];
        assert_eq!(all_tags(&notes), vec!["Work", "work"]);
    }
}
