// Top-level sections of `knowledge_base.yaml`.
pub const USER_PROFILER_CONFIG: &str = "user_profiler_config";
pub const ABSOLUTELY_CRITICAL: &str = "absolutely_critical";
pub const HIGHLY_RECOMMENDED_TO_REMOVE: &str = "highly_recommended_to_remove";
pub const HEURISTIC_RULES: &str = "heuristic_rules";

// Component kinds, as used for the rule set keys.
pub const SERVICES: &str = "services";
pub const UWP_APPS: &str = "uwp_apps";
pub const SCHEDULED_TASKS: &str = "scheduled_tasks";

// Persona labels.
pub const GAMER: &str = "Gamer";
pub const DEVELOPER: &str = "Developer";
pub const DESIGNER: &str = "Designer";
pub const OFFICE_WORKER: &str = "OfficeWorker";
pub const HOME_USER: &str = "HomeUser";
