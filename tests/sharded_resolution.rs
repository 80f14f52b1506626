use std::fs;
use std::path::{Path, PathBuf};

use context_assembly::ordering::DocumentType;
use context_assembly::security::ProjectBoundary;
use context_assembly::sharding::{parse_epic_identifier, resolve_epics, resolve_sharded};
use context_assembly::ContextError;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn index_order_then_sorted_orphans() {
    let dir = tempdir().unwrap();
    let arch = dir.path().join("docs/architecture");
    write(&arch.join("index.md"), "- [B](b-components.md)\n- [A](./a-overview.md)\n");
    write(&arch.join("a-overview.md"), "A");
    write(&arch.join("b-components.md"), "B");
    write(&arch.join("c-orphan.md"), "C");
    write(&arch.join("0-also-orphan.md"), "0");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let order = resolve_sharded(&arch, DocumentType::Architecture, &boundary).unwrap();

    assert_eq!(
        names(&order),
        vec!["b-components.md", "a-overview.md", "0-also-orphan.md", "c-orphan.md"]
    );
}

#[test]
fn index_is_never_returned() {
    let dir = tempdir().unwrap();
    let prd = dir.path().join("prd");
    write(&prd.join("index.md"), "- [Goals](goals.md)\n- [Index](index.md)\n");
    write(&prd.join("goals.md"), "goals");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let order = resolve_sharded(&prd, DocumentType::Prd, &boundary).unwrap();

    assert_eq!(names(&order), vec!["goals.md"]);
}

#[test]
fn dangling_and_duplicate_references_are_skipped() {
    let dir = tempdir().unwrap();
    let ux = dir.path().join("ux");
    write(&ux.join("index.md"), "[x](flows.md) [y](missing.md) [z](flows.md)");
    write(&ux.join("flows.md"), "flows");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let order = resolve_sharded(&ux, DocumentType::Ux, &boundary).unwrap();

    assert_eq!(names(&order), vec!["flows.md"]);
}

#[test]
fn without_index_every_shard_is_sorted_by_key() {
    let dir = tempdir().unwrap();
    let epics = dir.path().join("epics");
    write(&epics.join("epic-10-reporting.md"), "# Epic 10");
    write(&epics.join("epic-2-auth.md"), "# Epic 2");
    write(&epics.join("epic-1-setup.md"), "# Epic 1");
    write(&epics.join("notes.txt"), "not a document");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let order = resolve_sharded(&epics, DocumentType::Epics, &boundary).unwrap();

    assert_eq!(
        names(&order),
        vec!["epic-1-setup.md", "epic-2-auth.md", "epic-10-reporting.md"]
    );
}

#[test]
fn directory_outside_boundary_is_fatal() {
    let project = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    write(&elsewhere.path().join("shards/a.md"), "a");

    let boundary = ProjectBoundary::new(project.path()).unwrap();
    let result = resolve_sharded(&elsewhere.path().join("shards"), DocumentType::Generic, &boundary);

    assert!(matches!(result, Err(ContextError::Security(_))));
}

#[cfg(unix)]
#[test]
fn shard_symlinked_outside_boundary_is_skipped() {
    use std::os::unix::fs::symlink;

    let project = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    write(&elsewhere.path().join("leak.md"), "secret");
    let arch = project.path().join("arch");
    write(&arch.join("api.md"), "api");
    symlink(elsewhere.path().join("leak.md"), arch.join("leak.md")).unwrap();

    let boundary = ProjectBoundary::new(project.path()).unwrap();
    let order = resolve_sharded(&arch, DocumentType::Architecture, &boundary).unwrap();

    assert_eq!(names(&order), vec!["api.md"]);
}

#[test]
fn epic_identifier_parsing() {
    assert_eq!(parse_epic_identifier("# Epic 7: Payments\nbody"), Some(7));
    assert_eq!(parse_epic_identifier("intro\n## epic 12 - Search"), Some(12));
    assert_eq!(parse_epic_identifier("---\nepic_id: 4\n---\n# Title"), Some(4));
    assert_eq!(parse_epic_identifier("# Payments"), None);
}

#[test]
fn duplicate_epic_identifier_is_fatal_and_names_both_files() {
    let dir = tempdir().unwrap();
    let epics = dir.path().join("epics");
    write(&epics.join("epic-7-payments.md"), "# Epic 7: Payments\n");
    write(&epics.join("epic-8-refunds.md"), "# Epic 7: Refunds\n");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let err = resolve_epics(&epics, &boundary).unwrap_err();

    match err {
        ContextError::DuplicateIdentifier {
            identifier,
            first,
            second,
        } => {
            assert_eq!(identifier, 7);
            assert!(first.ends_with("epic-7-payments.md"));
            assert!(second.ends_with("epic-8-refunds.md"));
        }
        other => panic!("expected DuplicateIdentifier, got {other}"),
    }
}

#[test]
fn epics_resolve_in_index_order_with_identifiers() {
    let dir = tempdir().unwrap();
    let epics = dir.path().join("epics");
    write(&epics.join("index.md"), "[two](epic-2-auth.md)\n[one](epic-1-setup.md)\n");
    write(&epics.join("epic-1-setup.md"), "# Epic 1: Setup\n");
    write(&epics.join("epic-2-auth.md"), "# Epic 2: Auth\n");
    write(&epics.join("epic-3-extra.md"), "no header\n");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let shards = resolve_epics(&epics, &boundary).unwrap();

    let ids: Vec<Option<u64>> = shards.iter().map(|s| s.identifier).collect();
    assert_eq!(ids, vec![Some(2), Some(1), None]);
    assert!(shards.iter().all(|s| s.document.file_name() != "index.md"));
}

#[test]
fn uppercase_index_file_still_drives_order() {
    let dir = tempdir().unwrap();
    let arch = dir.path().join("docs/architecture");
    write(&arch.join("INDEX.md"), "- [Z](z.md)\n- [A](a.md)\n");
    write(&arch.join("a.md"), "A");
    write(&arch.join("z.md"), "Z");

    let boundary = ProjectBoundary::new(dir.path()).unwrap();
    let order = resolve_sharded(&arch, DocumentType::Architecture, &boundary).unwrap();

    assert_eq!(names(&order), vec!["z.md", "a.md"]);
}
