use bullet_isolator_engine::{
    CodecError, DocumentStore, FsStore, IndentUnit, Isolator, ListSyntax, LocateError,
    Provenance, SpliceError, WriteBack, apply_depth, decode, encode, locate, splice_back,
    strip_depth,
};
use pretty_assertions::assert_eq;
use relative_path::RelativePath;
use rstest::rstest;

const OUTLINE: &str = "# Projects
- Website
\t- Design
\t\t- Colours
\t\t- Fonts
\t- Build
- Garden
\t- Tomatoes
Closing paragraph";

fn outline_lines() -> Vec<&'static str> {
    OUTLINE.lines().collect()
}

fn provenance(start_line: usize, end_line: usize, root_depth: usize) -> Provenance {
    Provenance {
        origin: "origin.md".to_string(),
        start_line,
        end_line,
        root_depth,
    }
}

/// Extracting and immediately writing back is a no-op for every bullet root
#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[case(6)]
#[case(7)]
fn test_round_trip_identity(#[case] root: usize) {
    let lines = outline_lines();
    let syntax = ListSyntax::default();

    let subtree = locate(&lines, root, &syntax).unwrap();
    let text = encode(&subtree.body_lines, &subtree.provenance("origin.md"));
    let side = decode(&text).unwrap();
    let restored = splice_back(&lines, &side.provenance, &side.body_lines, syntax.indent).unwrap();

    assert_eq!(restored, lines);
}

#[test]
fn test_depth_normalization_inverse() {
    let body = vec!["- A", "\t- B", "\t\t- C", ""];

    for depth in 0..5 {
        for indent in [IndentUnit::Tabs, IndentUnit::Spaces(2), IndentUnit::Spaces(4)] {
            assert_eq!(strip_depth(&apply_depth(&body, depth, indent), depth, indent), body);
        }
    }
}

#[test]
fn test_boundary_correctness() {
    let lines = ["- A", "\t- B", "\t- C", "- D"];

    let subtree = locate(&lines, 0, &ListSyntax::default()).unwrap();

    // Root depth is 0 so the body keeps its tabs: relative depths 0, 1, 1
    assert_eq!(subtree.body_lines, vec!["- A", "\t- B", "\t- C"]);
    assert_eq!(subtree.end_line, 2);
}

#[test]
fn test_nested_subtree_bounds() {
    let lines = outline_lines();

    let subtree = locate(&lines, 2, &ListSyntax::default()).unwrap();

    assert_eq!(subtree.body_lines, vec!["- Design", "\t- Colours", "\t- Fonts"]);
    assert_eq!(subtree.root_depth, 1);
    assert_eq!((subtree.start_line, subtree.end_line), (2, 4));
}

#[test]
fn test_growth_splice() {
    let origin = ["x", "- A", "\t- B", "y"];
    let edited = ["- A", "\t- B", "\t- C"];

    let result = splice_back(&origin, &provenance(1, 2, 0), &edited, IndentUnit::Tabs).unwrap();

    assert_eq!(result, vec!["x", "- A", "\t- B", "\t- C", "y"]);
}

#[test]
fn test_shrink_splice() {
    let origin = ["x", "- A", "\t- B", "y"];

    let result = splice_back(&origin, &provenance(1, 2, 0), &["- A"], IndentUnit::Tabs).unwrap();

    assert_eq!(result, vec!["x", "- A", "y"]);
}

#[test]
fn test_malformed_decode() {
    assert_eq!(decode("no metadata here"), Err(CodecError::MissingMetadata));
}

#[test]
fn test_out_of_bounds_splice() {
    let origin = ["x", "- A", "y"];

    let result = splice_back(&origin, &provenance(5, 6, 0), &["- A"], IndentUnit::Tabs);

    assert_eq!(
        result,
        Err(SpliceError::RangeOutOfBounds {
            start: 5,
            end: 6,
            len: 3
        })
    );
}

#[test]
fn test_non_bullet_root() {
    let lines = outline_lines();

    let result = locate(&lines, 0, &ListSyntax::default());

    assert_eq!(result, Err(LocateError::NotABulletLine { line: 0 }));
}

#[test]
fn test_session_over_files() {
    // Given a notes directory with a CRLF outline
    let notes_dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(notes_dir.path());
    let origin = RelativePath::new("projects.md");
    let crlf = format!("{}\r\n", outline_lines().join("\r\n"));
    store.write(origin, &crlf).unwrap();

    let isolator = Isolator::new(store, ListSyntax::default(), ".isolated/side.md");

    // When isolating "Design" and replacing its children
    isolator.isolate(origin, 2).unwrap();
    let side = isolator.store().read(isolator.side_document()).unwrap();
    assert!(side.ends_with("---\n- Design\n\t- Colours\n\t- Fonts\n"));

    let edited = side.replace("\t- Colours\n\t- Fonts\n", "\t- Palette\n");
    isolator
        .store()
        .write(isolator.side_document(), &edited)
        .unwrap();

    let outcome = isolator.write_back().unwrap();

    // Then the origin shrinks by one line and keeps its CRLF endings
    let WriteBack::Written(report) = outcome else {
        panic!("write-back was dropped");
    };
    assert_eq!((report.lines_before, report.lines_after), (9, 8));

    let expected = "# Projects\r\n- Website\r\n\t- Design\r\n\t\t- Palette\r\n\t- Build\r\n- Garden\r\n\t- Tomatoes\r\nClosing paragraph\r\n";
    assert_eq!(isolator.store().read(origin).unwrap(), expected);
    assert!(!isolator.store().exists(isolator.side_document()));
    assert_eq!(isolator.pending().unwrap(), None);
}

#[test]
fn test_write_back_stays_inside_notes_dir() {
    // Given a file next to the notes directory and a side document pointing at it
    let root = tempfile::tempdir().unwrap();
    let notes_dir = root.path().join("notes");
    std::fs::create_dir(&notes_dir).unwrap();
    let outside = root.path().join("outside.md");
    std::fs::write(&outside, "keep\n- A\n").unwrap();

    let isolator = Isolator::new(FsStore::new(&notes_dir), ListSyntax::default(), "side.md");
    let side = "---\norigin: ../outside.md\nstartLine: 1\nendLine: 1\noffset: 0\n---\n- HIJACKED\n";
    isolator
        .store()
        .write(isolator.side_document(), side)
        .unwrap();

    // When writing back
    let result = isolator.write_back();

    // Then the write-back is refused and the outside file is untouched
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&outside).unwrap(), "keep\n- A\n");
    assert!(isolator.store().exists(isolator.side_document()));
}
