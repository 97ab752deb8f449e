use std::path::PathBuf;
use std::process::Command;

fn raylab_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_raylab")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target").join("debug").join("raylab"))
}

#[test]
fn cli_render_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    let status = Command::new(raylab_exe())
        .args([
            "render",
            "--scene",
            "Checkerboard",
            "--width",
            "32",
            "--height",
            "32",
            "--samples",
            "1",
            "--out",
        ])
        .arg(&out_path)
        .status()
        .expect("spawn raylab");
    assert!(status.success());

    assert!(out_path.is_file());
    assert_eq!(image::image_dimensions(&out_path).unwrap(), (32, 32));
}

#[test]
fn cli_render_accepts_params_file() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let params_path = dir.join("params.json");
    let out_path = dir.join("from_params.png");
    let _ = std::fs::remove_file(&out_path);

    std::fs::write(
        &params_path,
        r#"{"scene_name":"Horizontal Gradient","width":16,"height":8,"sample_count":2}"#,
    )
    .unwrap();

    let status = Command::new(raylab_exe())
        .arg("render")
        .arg("--params")
        .arg(&params_path)
        .arg("--out")
        .arg(&out_path)
        .status()
        .expect("spawn raylab");
    assert!(status.success());
    assert_eq!(image::image_dimensions(&out_path).unwrap(), (16, 8));
}

#[test]
fn cli_scenes_lists_catalog() {
    let output = Command::new(raylab_exe())
        .arg("scenes")
        .output()
        .expect("spawn raylab");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().any(|l| l == "Checkerboard"));
}

#[test]
fn cli_render_rejects_unknown_scene() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("rejected.png");
    let _ = std::fs::remove_file(&out_path);

    let output = Command::new(raylab_exe())
        .args(["render", "--scene", "Cornell Box", "--out"])
        .arg(&out_path)
        .output()
        .expect("spawn raylab");
    assert!(!output.status.success());
    assert!(!out_path.exists());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown scene"));
}
