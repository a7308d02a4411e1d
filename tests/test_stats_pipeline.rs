use chatstats::calendar::Granularity;
use chatstats::export::{SenderId, SenderIdentity};
use chatstats::stats::SenderCount;
use chatstats::{build_stats_as_of, ChatExport, GroupingScheme, StatsError, StatsOptions};
use std::path::PathBuf;
use std::process::Command;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/export.json")
}

fn load_fixture() -> ChatExport {
    ChatExport::load_from_file(&fixture_path()).expect("fixture should parse")
}

fn sender(from_id: &str, from: Option<&str>) -> SenderIdentity {
    SenderIdentity {
        from_id: SenderId::Text(from_id.to_string()),
        from: from.map(str::to_string),
    }
}

fn count(from_id: &str, from: Option<&str>, messages: usize) -> SenderCount {
    SenderCount {
        sender: sender(from_id, from),
        messages,
    }
}

#[test]
fn test_fixture_summary() {
    let stats = build_stats_as_of(&load_fixture(), &StatsOptions::default(), 2023).unwrap();

    assert_eq!(stats.name, "Rust Meetup");
    assert_eq!(stats.summary.total_messages, 7);
    assert_eq!(stats.summary.total_joins, 2);
    assert_eq!(stats.summary.total_invites, 1);
    // Bob and Bobby share an id but count separately.
    assert_eq!(stats.summary.distinct_senders, 5);
    assert_eq!(
        stats.summary.top_senders,
        vec![
            count("user200", Some("Bob"), 2),
            count("user400", Some("Dave"), 2),
            count("user100", Some("Alice"), 1),
        ]
    );

    assert_eq!(
        stats.coverage.first_message_date.to_string(),
        "2020-12-01 09:15:00"
    );
}

#[test]
fn test_fixture_per_year() {
    let stats = build_stats_as_of(&load_fixture(), &StatsOptions::default(), 2023).unwrap();

    let years: Vec<i32> = stats.years.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![2020, 2021, 2022, 2023]);

    let y2020 = stats.year(2020).unwrap();
    assert_eq!((y2020.messages, y2020.joins, y2020.invites), (2, 0, 1));
    assert_eq!(
        y2020.top_senders,
        vec![
            count("user100", Some("Alice"), 1),
            count("user200", Some("Bob"), 1),
        ]
    );

    let y2021 = stats.year(2021).unwrap();
    assert_eq!((y2021.messages, y2021.joins, y2021.invites), (5, 2, 0));
    assert_eq!(
        y2021.top_senders,
        vec![
            count("user400", Some("Dave"), 2),
            count("user200", Some("Bob"), 1),
            count("user200", Some("Bobby"), 1),
        ]
    );

    assert_eq!(stats.year(2022).unwrap().messages, 0);
    assert_eq!(stats.year(2023).unwrap().messages, 0);
}

#[test]
fn test_fixture_histograms() {
    let stats = build_stats_as_of(&load_fixture(), &StatsOptions::default(), 2023).unwrap();

    let months = stats.histogram(Granularity::Month).unwrap();
    assert_eq!(months.labels.first().map(String::as_str), Some("January"));
    assert_eq!(months.labels.last().map(String::as_str), Some("December"));
    assert_eq!(
        months.series("2020").unwrap().data,
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]
    );
    assert_eq!(
        months.series("2021").unwrap().data,
        vec![0, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(months.series("2022").unwrap().data, vec![0; 12]);

    let weekdays = stats.histogram(Granularity::Weekday).unwrap();
    assert_eq!(weekdays.labels.first().map(String::as_str), Some("Monday"));
    assert_eq!(
        weekdays.series("2020").unwrap().data,
        vec![0, 2, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        weekdays.series("2021").unwrap().data,
        vec![2, 1, 1, 0, 0, 0, 1]
    );

    let peaks = stats.peaks.as_ref().unwrap();
    assert_eq!(peaks.year.as_ref().unwrap().year, 2021);
    assert_eq!(peaks.month.as_ref().unwrap().month, "2021-03");
    assert_eq!(peaks.weekday.as_ref().unwrap().weekday, "Tuesday");
}

#[test]
fn test_fixture_flat_hours() {
    let options = StatsOptions {
        grouping: GroupingScheme::Flat,
        granularities: vec![Granularity::Hour],
    };
    let stats = build_stats_as_of(&load_fixture(), &options, 2023).unwrap();

    assert_eq!(stats.histograms.len(), 1);
    let hours = stats.histogram(Granularity::Hour).unwrap();
    assert_eq!(hours.series.len(), 1);

    let data = &hours.series[0].data;
    assert_eq!(data.iter().sum::<usize>(), stats.summary.total_messages);
    assert_eq!(data[9], 2);
    assert_eq!(data[18], 1);
}

#[test]
fn test_rejections() {
    let err = ChatExport::from_json_str(r#"{"messages": []}"#).unwrap_err();
    assert!(matches!(err, StatsError::InvalidInputFormat { .. }));

    let export = ChatExport::from_json_str(r#"{"name": "empty", "messages": []}"#).unwrap();
    let err = build_stats_as_of(&export, &StatsOptions::default(), 2023).unwrap_err();
    assert!(matches!(err, StatsError::EmptyMessageSet));
    assert_eq!(err.to_string(), "The export contains no messages");

    let export = ChatExport::from_json_str(
        r#"{"name": "bad", "messages": [
            {"type": "message", "date": "2021-01-05T10:00", "from": "A", "from_id": 1}
        ]}"#,
    )
    .unwrap();
    let err = build_stats_as_of(&export, &StatsOptions::default(), 2023).unwrap_err();
    assert!(matches!(err, StatsError::MalformedTimestamp { .. }));
    assert!(err.to_string().contains("2021-01-05T10:00"));
}

#[test]
fn test_cli_writes_reports() {
    let out_dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_chatstats"))
        .arg("--input")
        .arg(fixture_path())
        .arg("--output")
        .arg(out_dir.path())
        .arg("--granularity")
        .arg("month,hour")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let markdown = std::fs::read_to_string(out_dir.path().join("chatstats-rust-meetup.md")).unwrap();
    assert!(markdown.contains("Rust Meetup"));
    assert!(markdown.contains("#### 🕐 By hour\n"));
    assert!(!markdown.contains("#### 📅 By weekday\n"));

    let stats = chatstats::StatisticsResult::load_from_file(
        &out_dir.path().join("chatstats-rust-meetup.json"),
    )
    .unwrap();
    assert_eq!(stats.summary.total_messages, 7);
    assert_eq!(stats.histograms.len(), 2);
}

#[test]
fn test_cli_rejects_non_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.txt");
    std::fs::copy(fixture_path(), &path).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_chatstats"))
        .arg("--input")
        .arg(&path)
        .arg("--output")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Only JSON files are accepted"), "stderr: {}", stderr);
}

fn run_cli(args: &[&std::ffi::OsStr]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_chatstats"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_cli_fails_on_aggregation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("empty.json", r#"{"name": "empty", "messages": []}"#, "no messages"),
        (
            "bad-date.json",
            r#"{"name": "bad", "messages": [
                {"type": "message", "date": "2021-01-05 10:00:00", "from": "A", "from_id": 1}
            ]}"#,
            "Malformed timestamp",
        ),
    ];

    for (file_name, content, expected) in cases {
        let path = dir.path().join(file_name);
        std::fs::write(&path, content).unwrap();

        let output = run_cli(&[
            "--input".as_ref(),
            path.as_os_str(),
            "--output".as_ref(),
            dir.path().as_os_str(),
        ]);

        assert!(!output.status.success(), "{} should be rejected", file_name);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(expected), "stderr: {}", stderr);
    }
    assert!(!dir.path().join("chatstats-empty.md").exists());
    assert!(!dir.path().join("chatstats-bad.json").exists());
}

#[test]
fn test_cli_fails_without_work_to_do() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(&["--output".as_ref(), dir.path().as_os_str()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No action specified"));

    let output = run_cli(&[
        "--input".as_ref(),
        fixture_path().as_os_str(),
        "--output".as_ref(),
        dir.path().as_os_str(),
        "--render".as_ref(),
        "pdf,html".as_ref(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No known render format"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
