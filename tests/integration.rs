use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn rbot_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("rbot");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    fs::write(
        root.join("ranking.csv"),
        "Atleta;Equipo;Prueba;Marca;Ano;Fecha;Puesto;Viento\n\
         Jose Perez;Club Atletico;100 ML MASCULINO;11.20;2024;01/05/2024;1;0.3\n\
         Kevin Viñuela;Ourense Atletismo;100 ML MASCULINO;10.95;2024;01/06/2024;1;-0.2\n\
         ;;;;;;;\n\
         Kevin Viñuela;Ourense Atletismo;200 ML MASCULINO;22.10;2023;10/07/2023;2;\n",
    )
    .unwrap();

    let config_content = format!(
        r#"[dataset]
path = "{}/ranking.csv"

[llm]
provider = "disabled"
"#,
        root.display()
    );

    let config_path = root.join("rbot.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_rbot(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = rbot_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run rbot binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_stats_loads_dataset() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_rbot(&config_path, &["stats"]);
    assert!(success, "stats failed: stdout={}, stderr={}", stdout, stderr);

    // Blank row dropped: 3 real rows, 2 athletes, 2 events
    assert!(stdout.contains("Rows:       3"), "stdout: {}", stdout);
    assert!(stdout.contains("Athletes:   2"), "stdout: {}", stdout);
    assert!(stdout.contains("Events:     2"), "stdout: {}", stdout);
    assert!(stdout.contains("Years:      2023-2024"), "stdout: {}", stdout);
}

#[test]
fn test_ask_with_disabled_provider_reports_without_crashing() {
    let (_tmp, config_path) = setup_test_env();

    // The extraction call fails (provider disabled); that is a per-question
    // message, not a process failure.
    let (stdout, _, success) = run_rbot(&config_path, &["ask", "resultados de Jose Perez"]);
    assert!(success);
    assert!(
        stdout.contains("Ocurrió un error al procesar tu solicitud"),
        "stdout: {}",
        stdout
    );
}

#[test]
fn test_bad_date_fails_load() {
    let (tmp, config_path) = setup_test_env();

    fs::write(
        tmp.path().join("ranking.csv"),
        "Atleta;Equipo;Prueba;Marca;Ano;Fecha\n\
         Jose Perez;Club;100 ML MASCULINO;11.20;2024;2024-05-01\n",
    )
    .unwrap();

    let (_, stderr, success) = run_rbot(&config_path, &["stats"]);
    assert!(!success, "load should fail on a bad date");
    assert!(stderr.contains("Invalid date"), "stderr: {}", stderr);
}

#[test]
fn test_missing_dataset_fails_once_at_startup() {
    let (tmp, config_path) = setup_test_env();

    fs::remove_file(tmp.path().join("ranking.csv")).unwrap();

    let (_, stderr, success) = run_rbot(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read dataset file"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_provider_rejected() {
    let (tmp, config_path) = setup_test_env();

    let config_content = format!(
        r#"[dataset]
path = "{}/ranking.csv"

[llm]
provider = "openai"
"#,
        tmp.path().display()
    );
    fs::write(&config_path, config_content).unwrap();

    let (_, stderr, success) = run_rbot(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Unknown llm provider"), "stderr: {}", stderr);
}
