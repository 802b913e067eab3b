use std::time::{Duration, SystemTime};
use wspec_knowledge::{CleanupTally, FileCandidate, HeuristicRule, KnowledgeBase, Safety};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn temp_rule() -> HeuristicRule {
    HeuristicRule {
        description: "Old temp files".to_owned(),
        heuristic: true,
        search_path: Some("C:\\Users\\ada\\AppData\\Local\\Temp".to_owned()),
        age_days: Some(7),
        extensions: vec![".tmp".to_owned(), "LOG".to_owned()],
        exclude: vec!["C:\\Users\\ada\\AppData\\Local\\Temp\\keep".to_owned()],
        ..HeuristicRule::default()
    }
}

fn file(path: &str, age_days: u64, now: SystemTime) -> FileCandidate {
    FileCandidate::new(path, 1024, now - DAY * u32::try_from(age_days).expect("small age"))
}

#[test]
fn extension_filter_is_case_insensitive_and_dot_optional() {
    let now = SystemTime::now();
    let rule = temp_rule();

    assert!(rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\a.TMP", 30, now), now));
    assert!(rule.matches(&file("c:/users/ada/appdata/local/temp/setup.log", 30, now), now));
    assert!(!rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\report.docx", 30, now), now));
}

#[test]
fn age_threshold_is_exclusive() {
    let now = SystemTime::now();
    let rule = temp_rule();

    assert!(!rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\fresh.tmp", 1, now), now));
    assert!(!rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\edge.tmp", 7, now), now));
    assert!(rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\old.tmp", 8, now), now));

    let future = FileCandidate::new("C:\\Users\\ada\\AppData\\Local\\Temp\\skew.tmp", 1, now + DAY);
    assert!(!rule.matches(&future, now));
}

#[test]
fn exclusions_and_roots_are_honoured() {
    let now = SystemTime::now();
    let rule = temp_rule();

    assert!(!rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\keep\\x.tmp", 30, now), now));
    assert!(rule.matches(&file("C:\\Users\\ada\\AppData\\Local\\Temp\\keeper.tmp", 30, now), now));
    assert!(!rule.matches(&file("D:\\Elsewhere\\x.tmp", 30, now), now));
}

#[test]
fn heuristic_rules_skip_files_in_subdirectories() {
    let now = SystemTime::now();
    let rule = HeuristicRule {
        heuristic: true,
        search_path: Some("C:\\Temp".to_owned()),
        age_days: Some(7),
        extensions: vec!["tmp".to_owned()],
        ..HeuristicRule::default()
    };

    assert!(rule.matches(&file("C:\\Temp\\x.tmp", 30, now), now));
    assert!(!rule.matches(&file("C:\\Temp\\Installer\\deep\\x.tmp", 30, now), now));
    assert!(!rule.matches(&file("C:\\Temp\\Installer\\x.tmp", 30, now), now));
    assert!(!rule.matches(&file("C:\\Temp", 30, now), now));
}

#[test]
fn tally_counts_and_sizes_matching_files() {
    let now = SystemTime::now();
    let rule = temp_rule();
    let old = now - DAY * 30;

    let files = [
        FileCandidate::new("C:\\Users\\ada\\AppData\\Local\\Temp\\a.tmp", 1_000, old),
        FileCandidate::new("C:\\Users\\ada\\AppData\\Local\\Temp\\b.log", 2_500, old),
        FileCandidate::new("C:\\Users\\ada\\AppData\\Local\\Temp\\c.tmp", 9_999, now),
        FileCandidate::new("C:\\Users\\ada\\AppData\\Local\\Temp\\d.docx", 9_999, old),
    ];

    assert_eq!(rule.tally(&files, now), CleanupTally { count: 2, size: 3_500 });
    assert_eq!(rule.tally(std::iter::empty(), now), CleanupTally::default());
}

#[test]
fn direct_rules_match_anything_under_their_paths() {
    let now = SystemTime::now();
    let rule = HeuristicRule {
        paths: vec!["C:\\Cache\\pip".to_owned(), "C:\\Cache\\npm".to_owned()],
        ..HeuristicRule::default()
    };

    assert!(rule.matches(&FileCandidate::new("C:\\Cache\\npm\\_cacache\\index", 10, now), now));
    assert!(!rule.matches(&FileCandidate::new("C:\\Cache\\cargo\\registry", 10, now), now));
}

#[test]
fn rules_load_from_the_knowledge_base() {
    let kb = KnowledgeBase::from_yaml_str(
        r"
absolutely_critical: {}
highly_recommended_to_remove: {}
heuristic_rules:
  pip_cache:
    description: pip cache
    paths: ['C:\Cache\pip']
    safety: low
  temp:
    heuristic: true
    search_path: 'C:\Temp'
    age_days: 3
    extensions: [tmp]
",
    )
    .expect("kb should load");

    let pip = kb.heuristic_rule("pip_cache").expect("pip rule");
    assert_eq!(pip.safety, Safety::Low);
    assert!(!pip.heuristic);

    let temp = kb.heuristic_rule("temp").expect("temp rule");
    assert_eq!(temp.safety, Safety::Medium);
    assert_eq!(temp.age_days, Some(3));
}
