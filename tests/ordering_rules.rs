use std::fs;
use std::path::PathBuf;

use context_assembly::ordering::{
    parse_index, parse_index_text, sort_key, sort_paths, DocumentType, SortClass,
};
use tempfile::tempdir;

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn epics_sort_numerically_not_lexically() {
    let mut paths = vec![
        PathBuf::from("/p/epics/epic-2-x.md"),
        PathBuf::from("/p/epics/epic-10-y.md"),
        PathBuf::from("/p/epics/epic-1-z.md"),
    ];
    sort_paths(DocumentType::Epics, &mut paths);

    assert_eq!(names(&paths), vec!["epic-1-z.md", "epic-2-x.md", "epic-10-y.md"]);
}

#[test]
fn index_first_and_malformed_epics_last() {
    let mut paths = vec![
        PathBuf::from("/p/epics/Zeta-notes.md"),
        PathBuf::from("/p/epics/epic-3.md"),
        PathBuf::from("/p/epics/appendix.md"),
        PathBuf::from("/p/epics/index.md"),
        PathBuf::from("/p/epics/epic-1.md"),
    ];
    sort_paths(DocumentType::Epics, &mut paths);

    assert_eq!(
        names(&paths),
        vec!["index.md", "epic-1.md", "epic-3.md", "appendix.md", "Zeta-notes.md"]
    );
}

#[test]
fn non_epic_types_sort_alphabetically_case_insensitive() {
    let mut paths = vec![
        PathBuf::from("/p/arch/Tech-Stack.md"),
        PathBuf::from("/p/arch/coding-standards.md"),
        PathBuf::from("/p/arch/INDEX.md"),
        PathBuf::from("/p/arch/api.md"),
    ];
    sort_paths(DocumentType::Architecture, &mut paths);

    assert_eq!(
        names(&paths),
        vec!["INDEX.md", "api.md", "coding-standards.md", "Tech-Stack.md"]
    );
}

#[test]
fn sort_key_classes() {
    assert_eq!(sort_key(DocumentType::Epics, "index.md").class, SortClass::Index);
    assert_eq!(sort_key(DocumentType::Epics, "epic-7-payments.md").number, 7);
    assert_eq!(sort_key(DocumentType::Epics, "epic-x.md").class, SortClass::Unmatched);
    assert_eq!(sort_key(DocumentType::Prd, "epic-x.md").class, SortClass::Matched);
}

#[test]
fn document_type_inference_from_names() {
    assert_eq!(DocumentType::from_name("Epics"), DocumentType::Epics);
    assert_eq!(DocumentType::from_name("ux-design"), DocumentType::Ux);
    assert_eq!(DocumentType::from_name("prd"), DocumentType::Prd);
    assert_eq!(DocumentType::from_name("research"), DocumentType::Generic);
}

#[test]
fn index_parser_keeps_only_local_document_links() {
    let text = "\
# Architecture

- [Overview](overview.md)
- [Stack](./tech-stack.md \"Tech stack\")
- [External](https://example.com/guide.md)
- [Protocol relative](//cdn.example.com/x.md)
- [Parent](../prd.md)
- [Nested](sub/dir.md)
- [Image](diagram.png)
- [Self](index.md)
- [Overview again](overview.md) and [API](api.md)
";
    let targets: Vec<String> = parse_index_text(text).into_iter().map(|r| r.target).collect();

    assert_eq!(targets, vec!["overview.md", "tech-stack.md", "overview.md", "api.md"]);
}

#[test]
fn index_parser_reports_surrounding_line() {
    let refs = parse_index_text("intro\n- [Auth](auth.md): login and session flows\n");

    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].line_number, 2);
    assert!(refs[0].line.contains("session flows"));
}

#[test]
fn index_parser_read_failure_yields_empty_list() {
    let dir = tempdir().unwrap();
    assert!(parse_index(&dir.path().join("missing/index.md")).is_empty());

    let binary = dir.path().join("index.md");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x81]).unwrap();
    assert!(parse_index(&binary).is_empty());
}
