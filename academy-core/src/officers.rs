use crate::models::Officer;

/// Rank for titles nobody recognizes. They sort after every known title.
pub const UNRANKED: u32 = 99;

/// Display rank of an officer title, lower first.
///
/// Matching ignores case, punctuation and spacing, so "Vice-President", "P.I.O." and "Sgt. at Arms" all resolve.
pub fn officer_rank(title: &str) -> u32 {
    let normalized: String = title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    match normalized.as_str() {
        "president" => 1,
        "vicepresident" => 2,
        "secretary" => 3,
        "treasurer" => 4,
        "auditor" => 5,
        "pio" | "publicinformationofficer" => 6,
        "sgtatarms" | "sergeantatarms" => 7,
        _ => UNRANKED,
    }
}

/// Officers in display order. Equal ranks keep their input order.
pub fn sorted_officers(officers: impl IntoIterator<Item = Officer>) -> Vec<Officer> {
    let mut officers: Vec<Officer> = officers.into_iter().collect();
    officers.sort_by_key(|officer| officer_rank(&officer.role));
    officers
}
