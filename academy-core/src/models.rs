//! The academy's record kinds, in the shape they are stored remotely and in the local cache.
use rally::Record;

/// Row id of the one and only branding record.
pub const BRANDING_ID: &str = "main";
pub const DEFAULT_ACADEMY_NAME: &str = "TALONS ACADEMY";

/// A fresh id such as `s-3f2a...`. Ids are minted once and never reassigned.
pub fn mint_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// NULL columns come back as `null`, which `#[serde(default)]` alone doesn't cover.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Elite => "Elite",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HealthStatus {
    #[default]
    #[serde(rename = "Fit to Play")]
    Fit,
    #[serde(rename = "Minor Injury")]
    Injury,
    Resting,
    #[serde(rename = "Under Medical Supervision")]
    Medical,
    Dismissed,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HealthStatus::Fit => "Fit to Play",
            HealthStatus::Injury => "Minor Injury",
            HealthStatus::Resting => "Resting",
            HealthStatus::Medical => "Under Medical Supervision",
            HealthStatus::Dismissed => "Dismissed",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttendanceRecord {
    /// `YYYY-MM-DD`
    pub date: String,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(date: impl Into<String>, status: AttendanceStatus) -> Self {
        Self {
            date: date.into(),
            status,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SessionType {
    #[default]
    Regular,
    Special,
    #[serde(rename = "Tournament Prep")]
    TournamentPrep,
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionType::Regular => "Regular",
            SessionType::Special => "Special",
            SessionType::TournamentPrep => "Tournament Prep",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub birthday: String,
    pub profile_pic: String,
    pub level: SkillLevel,
    pub health_status: HealthStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tournament_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plan_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl Default for Student {
    fn default() -> Self {
        Self {
            id: mint_id("s"),
            name: String::new(),
            age: 0,
            birthday: String::new(),
            profile_pic: String::new(),
            level: SkillLevel::default(),
            health_status: HealthStatus::default(),
            attendance: Vec::new(),
            tournament_ids: Vec::new(),
            training_plan_id: None,
            notes: String::new(),
        }
    }
}

impl Record for Student {
    const TABLE: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Coach {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub specialization: String,
    pub profile_pic: String,
    pub age: u32,
    pub phone: String,
}

impl Default for Coach {
    fn default() -> Self {
        Self {
            id: mint_id("c"),
            name: String::new(),
            email: String::new(),
            password: None,
            specialization: String::new(),
            profile_pic: String::new(),
            age: 0,
            phone: String::new(),
        }
    }
}

impl Record for Coach {
    const TABLE: &'static str = "coaches";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Officer {
    pub id: String,
    pub name: String,
    /// Free-form title, e.g. "Vice President" or "P.I.O.".
    pub role: String,
    pub profile_pic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Default for Officer {
    fn default() -> Self {
        Self {
            id: mint_id("o"),
            name: String::new(),
            role: String::new(),
            profile_pic: String::new(),
            contact: None,
        }
    }
}

impl Record for Officer {
    const TABLE: &'static str = "officers";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub date: String,
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self {
            id: mint_id("t"),
            name: String::new(),
            date: today(),
            location: String::new(),
            categories: Vec::new(),
            description: None,
        }
    }
}

impl Record for Tournament {
    const TABLE: &'static str = "tournaments";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    pub author: String,
}

impl Default for Announcement {
    fn default() -> Self {
        Self {
            id: mint_id("a"),
            title: String::new(),
            content: String::new(),
            date: today(),
            author: String::new(),
        }
    }
}

impl Record for Announcement {
    const TABLE: &'static str = "announcements";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrainingSession {
    pub id: String,
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub focus: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_levels: Vec<SkillLevel>,
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self {
            id: mint_id("sess"),
            title: String::new(),
            date: today(),
            start_time: String::new(),
            end_time: String::new(),
            focus: String::new(),
            session_type: SessionType::default(),
            target_levels: Vec::new(),
        }
    }
}

impl Record for TrainingSession {
    const TABLE: &'static str = "sessions";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Exercise {
    pub name: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
            description: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyPlan {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_duration: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for DailyPlan {
    fn default() -> Self {
        Self {
            id: mint_id("dp"),
            date: today(),
            start_time: String::new(),
            end_time: String::new(),
            total_duration: String::new(),
            title: String::new(),
            exercises: Vec::new(),
            notes: None,
        }
    }
}

impl Record for DailyPlan {
    const TABLE: &'static str = "daily_plans";
    const CACHE_KEY: &'static str = "plans";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Academy name and artwork. Stored as a single row with id [`BRANDING_ID`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrandingSettings {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            id: BRANDING_ID.to_string(),
            name: DEFAULT_ACADEMY_NAME.to_string(),
            logo_url: None,
            banner_url: None,
        }
    }
}

impl Record for BrandingSettings {
    const TABLE: &'static str = "academy_settings";
    const CACHE_KEY: &'static str = "branding";
    const ASSET_FOLDER: &'static str = "branding";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Records that carry a profile picture.
pub trait ProfilePicture: Record {
    /// Used in the asset path when the record has no name yet.
    const FALLBACK_NAME: &'static str;

    fn display_name(&self) -> &str;
    fn set_profile_pic(&mut self, url: String);
}

impl ProfilePicture for Student {
    const FALLBACK_NAME: &'static str = "new_student";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn set_profile_pic(&mut self, url: String) {
        self.profile_pic = url;
    }
}

impl ProfilePicture for Coach {
    const FALLBACK_NAME: &'static str = "new_coach";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn set_profile_pic(&mut self, url: String) {
        self.profile_pic = url;
    }
}

impl ProfilePicture for Officer {
    const FALLBACK_NAME: &'static str = "new_officer";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn set_profile_pic(&mut self, url: String) {
        self.profile_pic = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_unique_and_prefixed() {
        let first = Student::default();
        let second = Student::default();
        assert!(first.id.starts_with("s-"));
        assert_ne!(first.id, second.id);
        assert!(DailyPlan::default().id.starts_with("dp-"));
    }

    #[test]
    fn test_student_wire_shape() {
        let student = Student {
            id: "s9".to_string(),
            name: "Ana".to_string(),
            health_status: HealthStatus::Medical,
            attendance: vec![AttendanceRecord::new("2024-05-25", AttendanceStatus::Late)],
            ..Default::default()
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["profile_pic"], "");
        assert_eq!(json["health_status"], "Under Medical Supervision");
        assert_eq!(json["attendance"][0]["status"], "late");
        assert!(json.get("training_plan_id").is_none());
    }

    #[test]
    fn test_session_type_uses_display_labels() {
        let session = TrainingSession {
            session_type: SessionType::TournamentPrep,
            target_levels: vec![SkillLevel::Elite],
            ..Default::default()
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["type"], "Tournament Prep");
        assert_eq!(json["target_levels"][0], "Elite");
        assert_eq!(SessionType::TournamentPrep.to_string(), "Tournament Prep");
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let student: Student = serde_json::from_str(
            r#"{"id":"s1","name":"Juan","age":14,"birthday":"2010-05-15","profile_pic":"",
                "level":"Intermediate","health_status":"Fit to Play"}"#,
        )
        .unwrap();
        assert!(student.attendance.is_empty());
        assert!(student.tournament_ids.is_empty());
        assert_eq!(student.level, SkillLevel::Intermediate);
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let students: Vec<Student> = serde_json::from_str(
            r#"[
                {"id":"s1","name":"Juan","age":14,"birthday":"","profile_pic":"","level":"Elite",
                 "health_status":"Resting","attendance":null,"tournament_ids":null,"notes":null},
                {"id":"s2","name":"Maria","age":12,"birthday":"","profile_pic":"","level":"Beginner",
                 "health_status":"Fit to Play","attendance":[{"date":"2024-05-25","status":"absent"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(students.len(), 2);
        assert!(students[0].attendance.is_empty());
        assert!(students[0].tournament_ids.is_empty());
        assert_eq!(students[0].notes, "");
        assert_eq!(students[1].attendance[0].status, AttendanceStatus::Absent);

        let plan: DailyPlan = serde_json::from_str(
            r#"{"id":"dp","date":"","start_time":"","end_time":"","total_duration":"","title":"",
                "exercises":null}"#,
        )
        .unwrap();
        assert!(plan.exercises.is_empty());

        let branding: BrandingSettings =
            serde_json::from_str(r#"{"id":"main","name":null,"logo_url":null}"#).unwrap();
        assert_eq!(branding.name, "");
        assert_eq!(branding.banner_url, None);
    }

    #[test]
    fn test_branding_defaults() {
        let branding = BrandingSettings::default();
        assert_eq!(branding.id, "main");
        assert_eq!(branding.name, "TALONS ACADEMY");
        assert_eq!(<BrandingSettings as Record>::CACHE_KEY, "branding");
        assert_eq!(<DailyPlan as Record>::CACHE_KEY, "plans");
        assert_eq!(<DailyPlan as Record>::TABLE, "daily_plans");
    }
}
