use assert_cmd::Command;

fn prepchat(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("prepchat").unwrap();
    cmd.env_remove("PREPCHAT_CONFIG")
        .env_remove("PREPCHAT_BACKEND_URL")
        .env_remove("PREPCHAT_TOKEN")
        .arg("--config")
        .arg(config_dir.path().join("prepchat.toml"));
    cmd
}

#[test]
fn render_html_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    prepchat(&dir)
        .args(["render"])
        .write_stdin("**Newton** said *hi*")
        .assert()
        .success()
        .stdout(
            "<span><strong class=\"font-bold\">Newton</strong><span> said </span>\
             <em class=\"italic\">hi</em></span>\n",
        );
}

#[test]
fn render_markup_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("message.txt");
    std::fs::write(&input, "***x*** and ~~y~~").unwrap();

    prepchat(&dir)
        .args(["render", "--output", "markup"])
        .arg(&input)
        .assert()
        .success()
        .stdout("**x** and ~~y~~\n");
}

#[test]
fn render_uses_classes_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("prepchat.toml"),
        "[render]\ncode_class = \"mono\"\n",
    )
    .unwrap();

    prepchat(&dir)
        .args(["render"])
        .write_stdin("`ls`")
        .assert()
        .success()
        .stdout("<span><code class=\"mono\">ls</code></span>\n");
}

#[test]
fn empty_stdin_renders_nothing() {
    let dir = tempfile::tempdir().unwrap();
    prepchat(&dir)
        .args(["render"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn backend_commands_need_a_token() {
    let dir = tempfile::tempdir().unwrap();
    prepchat(&dir)
        .args(["--backend-url", "http://127.0.0.1:9", "pdfs"])
        .assert()
        .failure();
}
