// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_outline(sections: usize, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for section in 0..sections {
        lines.push(format!("# Section {section}"));
        lines.push(format!("- Topic {section}"));
        push_children(&mut lines, 1, depth);
        lines.push(String::new());
    }

    lines
}

#[allow(dead_code)]
fn push_children(lines: &mut Vec<String>, level: usize, max_depth: usize) {
    if level > max_depth {
        return;
    }

    for i in 0..3 {
        lines.push(format!("{}- Item {i} at level {level}", "\t".repeat(level)));
        push_children(lines, level + 1, max_depth);
    }
}
