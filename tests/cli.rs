use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TYPES: &str = "VFIAX:DS\nVBMFX:DB\n";
const HEADER: &str = "Account Number,Investment Name,Symbol,Shares,Share Price,Total Value,\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("investment-types.dat", TYPES);
        fixture
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn statement(&self, name: &str, rows: &str) -> PathBuf {
        self.write(name, &format!("{HEADER}{rows}"))
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("allocations").unwrap();
        cmd.current_dir(self.dir.path());
        cmd
    }
}

const TWO_FUNDS: &str = "\
1001,Fund A,VFIAX,10,100.00,1000.00,
1001,Fund B,VBMFX,20,50.00,1000.00,
N/A,Fund C,VTSAX,1,1.00,1.00,
";

#[test]
fn prints_allocation_report() {
    let fixture = Fixture::new();
    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);

    let expected = [
        "  Type :      Value     Perc",
        "==============================",
        "    DB :    1000.00    50.00",
        "    DS :    1000.00    50.00",
        "==============================",
        "       :    2000.00   100.00",
        "",
        "Summary",
        "==============================",
        "Stocks :    50.00",
        " Bonds :    50.00",
        " Other :     0.00",
        "",
    ]
    .join("\n");

    fixture
        .cmd()
        .arg(&statement)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn writes_to_output_file() {
    let fixture = Fixture::new();
    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);
    let output = fixture.dir.path().join("report.txt");

    fixture
        .cmd()
        .arg(&statement)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    let report = fs::read_to_string(output).unwrap();
    assert!(report.contains("    DS :    1000.00    50.00\n"));
}

#[test]
fn unclassified_symbols_are_warned_about() {
    let fixture = Fixture::new();
    let statement = fixture.statement(
        "vg-all.csv",
        "1001,Fund A,VFIAX,10,100.00,1000.00,\n1001,Mystery,VXXXX,1,1000.00,1000.00,\n",
    );

    fixture
        .cmd()
        .arg(&statement)
        .assert()
        .success()
        .stdout(predicate::str::contains("    ?? :    1000.00    50.00"))
        .stdout(predicate::str::contains(
            "VXXXX (Mystery) has no asset class, counted as unclassified (??)",
        ));
}

#[test]
fn header_only_statement_fails() {
    let fixture = Fixture::new();
    let statement = fixture.statement("empty.csv", "");

    fixture
        .cmd()
        .arg(&statement)
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("has no value to allocate"));
}

#[test]
fn bad_number_fails_without_partial_output() {
    let fixture = Fixture::new();
    let statement = fixture.statement("bad.csv", "1001,Fund A,VFIAX,ten,100.00,1000.00,\n");

    fixture
        .cmd()
        .arg(&statement)
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("\"ten\" is not a number"));
}

#[test]
fn oversized_shares_fail_cleanly() {
    let fixture = Fixture::new();
    let statement = fixture.statement(
        "huge.csv",
        "1001,Fund A,VFIAX,79228162514264337593543950335,2,1,\n",
    );

    fixture
        .cmd()
        .arg(&statement)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("statement line 2"))
        .stderr(predicate::str::contains("value of VFIAX is too large to compute"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn missing_files_fail() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .arg("nowhere.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));

    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);
    fixture
        .cmd()
        .arg(&statement)
        .args(["--types", "missing.dat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn malformed_types_file_fails() {
    let fixture = Fixture::new();
    let types = fixture.write("broken.dat", "VFIAX:DS\nVBMFX\n");
    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);

    fixture
        .cmd()
        .arg(&statement)
        .arg("--types")
        .arg(&types)
        .assert()
        .failure()
        .stderr(predicate::str::contains("classification line 2"));
}

#[test]
fn combined_mode_merges_statements() {
    let fixture = Fixture::new();
    let ira = fixture.statement("ira.csv", "1001,Fund A,VFIAX,30,100.00,3000.00,\n");
    let brokerage = fixture.statement("brokerage.csv", "2002,Fund B,VBMFX,20,50.00,1000.00,\n");

    fixture
        .cmd()
        .arg(&ira)
        .arg(&brokerage)
        .assert()
        .success()
        .stdout(predicate::str::contains("       :    4000.00   100.00"))
        .stdout(predicate::str::contains("Stocks :    75.00"));
}

#[test]
fn per_file_mode_reports_each_statement() {
    let fixture = Fixture::new();
    let ira = fixture.statement("ira.csv", "1001,Fund A,VFIAX,30,100.00,3000.00,\n");
    let empty = fixture.statement("closed.csv", "");

    fixture
        .cmd()
        .arg(&ira)
        .arg(&empty)
        .args(["--mode", "per-file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ira: 3000.00\n"))
        .stdout(predicate::str::contains("closed: 0.00\n"))
        .stdout(predicate::str::contains(
            "portfolio \"closed\" has no value to allocate",
        ));
}

#[test]
fn csv_format() {
    let fixture = Fixture::new();
    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);

    fixture
        .cmd()
        .arg(&statement)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(
            "type,value,percent\n\
             DB,1000.00,50.00\n\
             DS,1000.00,50.00\n\
             Stocks,,50.00\n\
             Bonds,,50.00\n\
             Other,,0.00\n",
        );
}

#[test]
fn custom_summary_groups() {
    let fixture = Fixture::new();
    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);

    fixture
        .cmd()
        .arg(&statement)
        .args(["--stock-codes", "DS,DB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stocks :   100.00"))
        .stdout(predicate::str::contains(" Bonds :     0.00"));
}

#[test]
fn lists_holdings_and_types() {
    let fixture = Fixture::new();
    let statement = fixture.statement("vg-all.csv", TWO_FUNDS);

    fixture
        .cmd()
        .arg(&statement)
        .arg("--holdings")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "VFIAX      10.00     100.00    1000.00   Fund A\n\
             VBMFX      20.00      50.00    1000.00   Fund B\n\n",
        ));

    fixture
        .cmd()
        .arg("--list-types")
        .assert()
        .success()
        .stdout("DB contains 2 funds\nVBMFX: DB\nVFIAX: DS\n");
}
