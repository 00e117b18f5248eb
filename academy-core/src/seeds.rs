//! Starter data shown on a fresh install, before anything has been saved.
use crate::models::{
    Announcement, AttendanceRecord, AttendanceStatus, BrandingSettings, Coach, DailyPlan,
    Exercise, HealthStatus, Officer, SessionType, SkillLevel, Student, Tournament,
    TrainingSession,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn picture(seed: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/400/400")
}

pub fn coaches() -> Vec<Coach> {
    vec![
        Coach {
            id: "c1".to_string(),
            name: "Coach Ricardo Santos".to_string(),
            email: "coach.rick@talons.com".to_string(),
            password: Some("password".to_string()),
            specialization: "Advanced Footwork & Strategy".to_string(),
            profile_pic: picture("coach1"),
            age: 38,
            phone: "0917-123-4567".to_string(),
        },
        Coach {
            id: "c2".to_string(),
            name: "Coach Elena Cruz".to_string(),
            email: "coach.elena@talons.com".to_string(),
            password: Some("password".to_string()),
            specialization: "Junior Development & Agility".to_string(),
            profile_pic: picture("coach2"),
            age: 29,
            phone: "0918-987-6543".to_string(),
        },
    ]
}

pub fn officers() -> Vec<Officer> {
    [
        ("o1", "Marcus Aurelius", "President", "off1", "09123456789"),
        ("o2", "Sophia Loren", "Vice President", "off2", "09123456788"),
        ("o3", "Lester Bangs", "Secretary", "off3", "09123456787"),
        ("o4", "Clara Oswald", "Treasurer", "off4", "09123456786"),
        ("o5", "Danny Pink", "Auditor", "off5", "09123456785"),
        ("o6", "Amy Pond", "P.I.O.", "off6", "09123456784"),
        ("o7", "Rory Williams", "Sgt. at Arms", "off7", "09123456783"),
    ]
    .into_iter()
    .map(|(id, name, role, pic, contact)| Officer {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        profile_pic: picture(pic),
        contact: Some(contact.to_string()),
    })
    .collect()
}

pub fn tournaments() -> Vec<Tournament> {
    vec![
        Tournament {
            id: "t1".to_string(),
            name: "Dumaguete City Open 2024".to_string(),
            date: "2024-06-12".to_string(),
            location: "Lamberto Macias Sports Complex".to_string(),
            categories: strings(&["Mens Singles Open", "Mixed Doubles U-17", "Boys Singles U-15"]),
            description: Some(
                "The premier city-wide open tournament for all Dumaguete badminton enthusiasts. \
                 Multiple categories ranging from youth to senior levels."
                    .to_string(),
            ),
        },
        Tournament {
            id: "t2".to_string(),
            name: "Negros Oriental Regional Meet".to_string(),
            date: "2024-07-05".to_string(),
            location: "Silliman Gym".to_string(),
            categories: strings(&["Boys Singles U-15", "Girls Singles U-15", "Mens Doubles Open"]),
            description: Some(
                "Regional level competition bringing together top talents from all over Negros \
                 Oriental. Qualification for state finals at stake."
                    .to_string(),
            ),
        },
    ]
}

pub fn students() -> Vec<Student> {
    vec![
        Student {
            id: "s1".to_string(),
            name: "Juan Dela Cruz".to_string(),
            age: 14,
            birthday: "2010-05-15".to_string(),
            profile_pic: picture("s1"),
            level: SkillLevel::Intermediate,
            health_status: HealthStatus::Fit,
            attendance: vec![AttendanceRecord::new("2024-05-25", AttendanceStatus::Present)],
            tournament_ids: strings(&["t1"]),
            training_plan_id: None,
            notes: "Strong smash, needs improvement on backhand clears.".to_string(),
        },
        Student {
            id: "s2".to_string(),
            name: "Maria Clara".to_string(),
            age: 12,
            birthday: "2012-11-20".to_string(),
            profile_pic: picture("s2"),
            level: SkillLevel::Beginner,
            health_status: HealthStatus::Injury,
            attendance: vec![],
            tournament_ids: vec![],
            training_plan_id: None,
            notes: "Very fast on court, focusing on basic net play.".to_string(),
        },
    ]
}

pub fn announcements() -> Vec<Announcement> {
    vec![Announcement {
        id: "a1".to_string(),
        title: "New Training Schedule for June".to_string(),
        content: "Starting next Monday, all intermediate classes will be moved to 4 PM. \
                  Please check your assigned courts."
            .to_string(),
        date: "2024-05-20".to_string(),
        author: "Coach Rick".to_string(),
    }]
}

pub fn sessions() -> Vec<TrainingSession> {
    vec![TrainingSession {
        id: "sess1".to_string(),
        title: "Morning Elite Drills".to_string(),
        date: "2024-05-25".to_string(),
        start_time: "08:00 AM".to_string(),
        end_time: "10:00 AM".to_string(),
        focus: "Multi-shuttle smash accuracy".to_string(),
        session_type: SessionType::Regular,
        target_levels: vec![SkillLevel::Elite, SkillLevel::Advanced],
    }]
}

pub fn daily_plans() -> Vec<DailyPlan> {
    vec![DailyPlan {
        id: "dp1".to_string(),
        date: "2024-05-25".to_string(),
        start_time: "08:00 AM".to_string(),
        end_time: "10:00 AM".to_string(),
        total_duration: "120 mins".to_string(),
        title: "High-Intensity Smash Block".to_string(),
        exercises: vec![
            Exercise::new("Warm-up: Dynamic Stretching", "15 mins"),
            Exercise::new("Footwork: 6-Point Shadow", "20 mins"),
            Exercise::new("Drill: Multi-shuttle Attacking", "45 mins"),
            Exercise::new("Match: Tactical Half-Court", "30 mins"),
            Exercise::new("Cool down: Static Stretching", "10 mins"),
        ],
        notes: Some(
            "Today's focus is exclusively on steepness of the smash. \
             Ensure students keep their elbow high."
                .to_string(),
        ),
    }]
}

pub fn branding() -> Vec<BrandingSettings> {
    vec![BrandingSettings::default()]
}
