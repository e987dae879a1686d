use vidlytics::ingest::{FileSelection, MAX_FILE_CHARS, TRUNCATION_MARKER, truncate_content};

#[test]
fn later_selection_never_replaces_queued_names() {
    let mut selection = FileSelection::default();
    assert_eq!(selection.add(["exports/a.csv", "exports/b.csv"]), 2);
    assert_eq!(selection.add(["other/a.csv", "exports/c.csv"]), 1);

    assert_eq!(selection.names(), ["a.csv", "b.csv", "c.csv"]);
    assert_eq!(
        selection.files()[0].path(),
        std::path::Path::new("exports/a.csv")
    );
}

#[test]
fn only_csv_names_are_accepted() {
    let mut selection = FileSelection::default();
    selection.add(["notes.txt", "Views.CSV", "archive.csv.zip", "folder/"]);
    assert_eq!(selection.names(), ["Views.CSV"]);
}

#[test]
fn truncation_bound_holds_around_the_limit() {
    for len in [0, 1, MAX_FILE_CHARS - 1, MAX_FILE_CHARS, MAX_FILE_CHARS + 1, MAX_FILE_CHARS * 2] {
        let (text, truncated) = truncate_content("ä".repeat(len));
        let kept = len.min(MAX_FILE_CHARS);
        assert_eq!(truncated, len > MAX_FILE_CHARS, "len {len}");
        let expected = if truncated {
            kept + TRUNCATION_MARKER.chars().count()
        } else {
            kept
        };
        assert_eq!(text.chars().count(), expected, "len {len}");
    }
}
