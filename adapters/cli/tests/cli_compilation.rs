use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "maze-sprint"])
        .status()
        .expect("failed to invoke cargo check for maze-sprint CLI binary");

    assert!(status.success(), "cargo check --bin maze-sprint should succeed");
}

#[test]
fn print_maze_renders_a_seeded_board() {
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "run",
            "--quiet",
            "--bin",
            "maze-sprint",
            "--",
            "--seed",
            "7",
            "--print-maze",
        ])
        .output()
        .expect("failed to invoke maze-sprint --print-maze");

    assert!(output.status.success(), "--print-maze should exit cleanly");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2 * 17 + 1);
    assert!(lines.iter().all(|line| line.chars().count() == 4 * 33 + 1));
    for glyph in ['S', 'E', 'L', 'I'] {
        assert_eq!(stdout.matches(glyph).count(), 1, "expected one {glyph}");
    }
}
