mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn script(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("clinic_pricing_cli").unwrap();
    cmd.env("CLINIC_PRICING_CLI_SCRIPT", "1")
        .env("CLINIC_PRICING_HOME", home);
    cmd
}

#[test]
fn script_mode_imports_and_saves_packages() {
    let home = common::temp_base();
    let text = common::write_fixture(&home, "packages.txt", "슈링크+인모드 590,000원\n");
    let input = format!(
        "procedure 슈링크 9.9만 15만\nimport \"{}\"\nsummary 슈링크\nsave\nexit\n",
        text.display()
    );

    script(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Procedure `슈링크` saved"))
        .stdout(contains(
            "Imported 1 package(s) using the simple grammar: 1 item(s) priced, 1 unpriced.",
        ))
        .stdout(contains("Summary: 슈링크+인모드"))
        .stdout(contains("Price book saved"));

    let json = std::fs::read_to_string(home.join("price_book.json")).unwrap();
    assert!(json.contains("\"슈링크+인모드\""));
}

#[test]
fn script_mode_reports_discount_violations() {
    let home = common::temp_base();
    let input = "\
item add 리쥬란 session 0 20만
item option 리쥬란 54만 3
item option 리쥬란 100만 5
rows 리쥬란
validate
exit
";

    script(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("회당가"))
        .stdout(contains(
            "[리쥬란] 5회 단가 200,000원이(가) 3회 단가 180,000원보다 낮지 않습니다",
        ))
        .stdout(contains("1 violation(s) found."));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = common::temp_base();
    script(&home)
        .write_stdin("summry\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `summry`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn branch_selection_persists_in_config() {
    let home = common::temp_base();
    let sheet = common::write_fixture(
        &home,
        "gangnam.json",
        r#"[{"no":1,"category":"리프팅","name":"울쎄라","standard_price":500000}]"#,
    );
    let input = format!(
        "branch load 강남점 \"{}\"\nbranch use 강남점\nbranch use 없는점\nexit\n",
        sheet.display()
    );

    script(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Loaded 1 procedure(s) for branch `강남점`."))
        .stdout(contains("Active branch set to `강남점`."))
        .stdout(contains("branch `없는점` has no price sheet"));

    let config = std::fs::read_to_string(home.join("config.json")).unwrap();
    assert!(config.contains("강남점"));
}

#[test]
fn missing_arguments_show_usage() {
    let home = common::temp_base();
    script(&home)
        .write_stdin("rows\nhelp rows\nexit\n")
        .assert()
        .success()
        .stdout(contains("usage: rows <item name>"))
        .stdout(contains("Help: rows"))
        .stdout(contains("Unsaved").not());
}

#[test]
fn packages_can_be_listed_and_removed() {
    let home = common::temp_base();
    let text = common::write_fixture(
        &home,
        "packages.txt",
        "슈링크+인모드 590,000원\n파워윤곽주사 3회 99,000원\n",
    );
    let input = format!(
        "# two single-line packages\nimport \"{}\"\npackages\npackages remove 파워윤곽주사\npackages remove 울쎄라\nexit\n",
        text.display()
    );

    script(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("59만원"))
        .stdout(contains("Removed package `파워윤곽주사 3회` (1 item(s))."))
        .stdout(contains("package `울쎄라` not found"))
        .stdout(contains("Unknown command").not());
}

#[test]
fn dropping_the_active_branch_clears_it() {
    let home = common::temp_base();
    let sheet = common::write_fixture(
        &home,
        "hongdae.json",
        r#"[{"no":1,"category":"보톡스","name":"사각턱","standard_price":50000}]"#,
    );
    let input = format!(
        "branch load 홍대점 \"{}\"\nbranch use 홍대점\nbranch drop 홍대점\nbranch list\nexit\n",
        sheet.display()
    );

    script(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Dropped branch `홍대점` (1 procedure(s))."))
        .stdout(contains("No branch price sheets loaded."));

    let config = std::fs::read_to_string(home.join("config.json")).unwrap();
    assert!(!config.contains("홍대점"));
}

#[test]
fn version_and_import_help_describe_this_tool() {
    let home = common::temp_base();
    script(&home)
        .write_stdin("version\nhelp import\nexit\n")
        .assert()
        .success()
        .stdout(contains("Book schema : v1"))
        .stdout(contains("price_book.json"))
        .stdout(contains("ㄴ슈링크: 1체 9.9만원 / 이벤트 15만원"));
}
