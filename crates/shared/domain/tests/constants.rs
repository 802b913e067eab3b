use wspec_domain::component::ComponentKind;
use wspec_domain::constants::{
    ABSOLUTELY_CRITICAL, HEURISTIC_RULES, HIGHLY_RECOMMENDED_TO_REMOVE, OFFICE_WORKER,
    SCHEDULED_TASKS, SERVICES, USER_PROFILER_CONFIG, UWP_APPS,
};
use wspec_domain::persona::Persona;

#[test]
fn constants_match_knowledge_base_keys() {
    assert_eq!(USER_PROFILER_CONFIG, "user_profiler_config");
    assert_eq!(ABSOLUTELY_CRITICAL, "absolutely_critical");
    assert_eq!(HIGHLY_RECOMMENDED_TO_REMOVE, "highly_recommended_to_remove");
    assert_eq!(HEURISTIC_RULES, "heuristic_rules");
}

#[test]
fn kinds_and_personas_use_the_constants() {
    assert_eq!(ComponentKind::Service.section_key(), SERVICES);
    assert_eq!(ComponentKind::UwpApp.section_key(), UWP_APPS);
    assert_eq!(ComponentKind::ScheduledTask.section_key(), SCHEDULED_TASKS);
    assert_eq!(Persona::OfficeWorker.as_str(), OFFICE_WORKER);
}

#[test]
fn component_kind_serde_accepts_plural_alias() {
    let kind: ComponentKind = serde_json::from_str("\"uwp_apps\"").expect("alias");
    assert_eq!(kind, ComponentKind::UwpApp);
    assert_eq!(serde_json::to_string(&ComponentKind::ScheduledTask).expect("ser"), "\"scheduled_task\"");
}
