use wspec_knowledge::domain::component::ComponentKind;
use wspec_knowledge::domain::persona::Persona;
use wspec_knowledge::{
    Blocklist, BreakageRisk, Classification, DomainCatalog, DomainVerdict, KnowledgeBase,
};

const KB: &str = r"
absolutely_critical:
  services: [WinDefend, RpcSs]
  uwp_apps: [Microsoft.WindowsStore]
highly_recommended_to_remove:
  services: [DiagTrack]
  scheduled_tasks: ['\Microsoft\Windows\Autochk\Proxy']
";

fn kb() -> KnowledgeBase {
    let blocklist = Blocklist::parse(
        "# Windows telemetry\nvortex.data.microsoft.com\ndata.microsoft.com\n\n# Ads\nads.msn.com\n",
    )
    .expect("blocklist should parse");
    let domains = DomainCatalog::from_yaml_str(
        "- domain: data.microsoft.com\n  category: telemetry\n  breakage_risk: medium\n- domain: vortex.data.microsoft.com\n  category: telemetry\n  breakage_risk: none\n  provenance: {added_by: maintainers, confidence: 0.9}\n",
    )
    .expect("catalog should parse");

    KnowledgeBase::from_yaml_str(KB)
        .expect("kb should load")
        .with_blocklist(blocklist)
        .with_domains(domains)
}

#[test]
fn identifiers_classify_by_single_category() {
    let kb = kb();
    let classifier = kb.classifier();

    assert_eq!(classifier.classify(ComponentKind::Service, "RpcSs"), Classification::Critical);
    assert_eq!(classifier.classify(ComponentKind::Service, "DiagTrack"), Classification::RecommendedRemoval);
    assert_eq!(
        classifier.classify(ComponentKind::ScheduledTask, "\\microsoft\\windows\\autochk\\proxy"),
        Classification::RecommendedRemoval
    );
    assert_eq!(classifier.classify(ComponentKind::Service, "Spooler"), Classification::Unknown);
}

#[test]
fn kind_matters_for_classification() {
    let kb = kb();
    assert_eq!(
        kb.classifier().classify(ComponentKind::UwpApp, "DiagTrack"),
        Classification::Unknown
    );
}

#[test]
fn most_specific_domain_entry_wins() {
    let kb = kb();
    let classifier = kb.classifier();

    match classifier.lookup_domain("Vortex.Data.Microsoft.com") {
        DomainVerdict::Annotated { entry } => {
            assert_eq!(entry.breakage_risk, BreakageRisk::None);
            assert_eq!(entry.provenance.confidence, Some(0.9));
        },
        other => panic!("expected annotated entry, got {other:?}"),
    }

    match classifier.lookup_domain("eu.settings.data.microsoft.com") {
        DomainVerdict::Annotated { entry } => {
            assert_eq!(entry.domain, "data.microsoft.com");
            assert_eq!(entry.breakage_risk, BreakageRisk::Medium);
        },
        other => panic!("expected parent entry, got {other:?}"),
    }
}

#[test]
fn blocklist_only_domains_report_their_group() {
    let kb = kb();
    match kb.classifier().lookup_domain("rad.ads.msn.com") {
        DomainVerdict::Blocklisted { entry } => {
            assert_eq!(entry.domain, "ads.msn.com");
            assert_eq!(entry.group.as_deref(), Some("Ads"));
        },
        other => panic!("expected blocklisted, got {other:?}"),
    }
}

#[test]
fn unrelated_or_invalid_domains_are_unknown() {
    let kb = kb();
    let classifier = kb.classifier();
    assert_eq!(classifier.lookup_domain("example.org"), DomainVerdict::Unknown);
    assert_eq!(classifier.lookup_domain("not a domain"), DomainVerdict::Unknown);
    assert_eq!(classifier.lookup_domain("msn.com"), DomainVerdict::Unknown);
}

#[test]
fn blocklist_ignores_comments_and_blank_lines() {
    let list = Blocklist::parse("# comment\n\n   \nexample.com\n# trailing\n").expect("parse");
    let domains: Vec<_> = list.domains().collect();
    assert_eq!(domains, ["example.com"]);
}

#[test]
fn steam_library_points_at_gamer() {
    let kb = kb();
    let profiler = kb.profiler();

    let paths = ["C:\\Program Files (x86)\\Steam\\steamapps\\common\\Portal 2", "C:\\Windows\\System32"];
    let ranked = profiler.rank(paths, ["Mozilla Firefox"]);

    assert_eq!(ranked.first().map(|s| s.persona), Some(Persona::Gamer));
    assert!(ranked.iter().all(|s| s.persona != Persona::Developer && s.persona != Persona::Designer));
    assert_eq!(profiler.best(paths, ["Mozilla Firefox"]), vec![Persona::Gamer]);
}

#[test]
fn keywords_and_markers_add_up() {
    let kb = kb();
    let ranked = kb.profiler().rank(
        ["C:\\Users\\ada\\source\\repos\\winspector", "D:\\Steam\\steamapps"],
        ["Docker Desktop", "Microsoft Visual Studio Code", "Steam"],
    );

    let developer = ranked.iter().find(|s| s.persona == Persona::Developer).expect("developer scored");
    assert_eq!(developer.markers, ["\\source\\repos"]);
    assert_eq!(developer.keywords, ["visual studio", "docker"]);
    assert_eq!(ranked[0].persona, Persona::Developer);
}

#[test]
fn ties_keep_persona_order_and_no_evidence_means_home_user() {
    let kb = kb();
    let profiler = kb.profiler();

    assert_eq!(
        profiler.best(["D:\\Steam\\steamapps"], ["Figma"]),
        vec![Persona::Gamer, Persona::Designer]
    );
    assert_eq!(profiler.best([""; 0], ["Notepad++"]), vec![Persona::HomeUser]);
}
