use rally::{
    CacheConfig, Error, FileCache, ImageSelection, LoadSource, LocalCache,
    PersistenceCoordinator, Record, RemoteConfig, RemoteGateway, Result, StorageHealth,
    SupabaseGateway, SyncMode, UploadOutcome,
};

use crate::{
    attendance,
    models::{
        Announcement, AttendanceStatus, BRANDING_ID, BrandingSettings, Coach, DEFAULT_ACADEMY_NAME,
        DailyPlan, Officer, ProfilePicture, Student, Tournament, TrainingSession,
    },
    officers, seeds,
};

/// Where each kind's data came from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub students: LoadSource,
    pub coaches: LoadSource,
    pub officers: LoadSource,
    pub tournaments: LoadSource,
    pub announcements: LoadSource,
    pub sessions: LoadSource,
    pub daily_plans: LoadSource,
    pub branding: LoadSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandingSlot {
    Logo,
    Banner,
}

impl BrandingSlot {
    fn file_name(self) -> &'static str {
        match self {
            BrandingSlot::Logo => "academy_logo",
            BrandingSlot::Banner => "academy_banner",
        }
    }

    fn set(self, branding: &mut BrandingSettings, url: String) {
        match self {
            BrandingSlot::Logo => branding.logo_url = Some(url),
            BrandingSlot::Banner => branding.banner_url = Some(url),
        }
    }
}

/// Every record kind of the academy behind one coordinator.
pub struct Academy<G, C> {
    coordinator: PersistenceCoordinator<G, C>,
}

impl Academy<SupabaseGateway, FileCache> {
    /// Supabase when `remote` is configured, otherwise local-only. Either way snapshots go to `cache`.
    pub fn open(remote: RemoteConfig, cache: &CacheConfig) -> Self {
        let gateway = SupabaseGateway::new(remote);
        let academy = Self::with_parts(gateway, FileCache::new(cache));
        log::info!(
            "Opened academy in {:?} mode, caching under {}",
            academy.mode(),
            cache.directory.display()
        );
        academy
    }
}

impl<G: RemoteGateway, C: LocalCache> Academy<G, C> {
    pub fn with_parts(gateway: G, cache: C) -> Self {
        Self {
            coordinator: PersistenceCoordinator::new(gateway, cache),
        }
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator<G, C> {
        &self.coordinator
    }

    pub fn mode(&self) -> SyncMode {
        self.coordinator.mode()
    }

    /// Loads every kind at once. A kind that fails to load from the remote service falls back on its own.
    pub async fn load_all(&self) -> LoadReport {
        let c = &self.coordinator;
        let (students, coaches, officers, tournaments, announcements, sessions, daily_plans, branding) = futures::join!(
            c.load(seeds::students()),
            c.load(seeds::coaches()),
            c.load(seeds::officers()),
            c.load(seeds::tournaments()),
            c.load(seeds::announcements()),
            c.load(seeds::sessions()),
            c.load(seeds::daily_plans()),
            c.load(seeds::branding()),
        );
        LoadReport {
            students,
            coaches,
            officers,
            tournaments,
            announcements,
            sessions,
            daily_plans,
            branding,
        }
    }

    pub async fn save<R: Record>(&self, record: R) -> Result<R> {
        self.coordinator.save(record).await
    }

    pub async fn delete<R: Record>(&self, id: &str) -> Result<()> {
        self.coordinator.delete::<R>(id).await
    }

    pub fn students(&self) -> Vec<Student> {
        self.coordinator.snapshot::<Student>().to_vec()
    }

    pub fn coaches(&self) -> Vec<Coach> {
        self.coordinator.snapshot::<Coach>().to_vec()
    }

    /// Officers ordered by title.
    pub fn officers(&self) -> Vec<Officer> {
        officers::sorted_officers(self.coordinator.snapshot::<Officer>().iter().cloned())
    }

    pub fn tournaments(&self) -> Vec<Tournament> {
        self.coordinator.snapshot::<Tournament>().to_vec()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.coordinator.snapshot::<Announcement>().to_vec()
    }

    pub fn sessions(&self) -> Vec<TrainingSession> {
        self.coordinator.snapshot::<TrainingSession>().to_vec()
    }

    pub fn daily_plans(&self) -> Vec<DailyPlan> {
        self.coordinator.snapshot::<DailyPlan>().to_vec()
    }

    /// Current branding. A stored row with a blank name shows the default name.
    pub fn branding(&self) -> BrandingSettings {
        let mut branding = self
            .coordinator
            .get::<BrandingSettings>(BRANDING_ID)
            .unwrap_or_default();
        if branding.name.trim().is_empty() {
            branding.name = DEFAULT_ACADEMY_NAME.to_string();
        }
        branding
    }

    /// Each student with their status for `date` (`YYYY-MM-DD`).
    pub fn attendance_on(&self, date: &str) -> Vec<(Student, Option<AttendanceStatus>)> {
        let students = self.coordinator.snapshot::<Student>();
        attendance::attendance_on(students.iter(), date)
            .into_iter()
            .map(|(student, status)| (student.clone(), status))
            .collect()
    }

    /// Flips the student's attendance for `date` and saves the whole record.
    pub async fn toggle_attendance(&self, student_id: &str, date: &str) -> Result<Student> {
        let Some(mut student) = self.coordinator.get::<Student>(student_id) else {
            return Err(Error::RecordNotFound {
                table: Student::TABLE,
                id: student_id.to_string(),
            });
        };
        student.attendance = attendance::toggle_attendance(&student.attendance, date);
        self.coordinator.save(student).await
    }

    /// Replaces the academy name and artwork. A blank name falls back to the default one.
    pub async fn apply_branding(
        &self,
        name: &str,
        logo_url: Option<String>,
        banner_url: Option<String>,
    ) -> Result<BrandingSettings> {
        let name = name.trim();
        let branding = BrandingSettings {
            id: BRANDING_ID.to_string(),
            name: if name.is_empty() {
                DEFAULT_ACADEMY_NAME.to_string()
            } else {
                name.to_string()
            },
            logo_url,
            banner_url,
        };
        self.coordinator.save(branding).await
    }

    /// Shows `image` on the record right away and replaces it with the durable URL once uploaded.
    pub async fn upload_profile_picture<R: ProfilePicture>(
        &self,
        record: R,
        image: ImageSelection,
    ) -> Result<UploadOutcome> {
        let display_name = match record.display_name().trim() {
            "" => R::FALLBACK_NAME.to_string(),
            name => name.to_string(),
        };
        self.coordinator
            .upload_asset(record, &display_name, image, R::set_profile_pic)
            .await
    }

    pub async fn upload_branding_image(
        &self,
        slot: BrandingSlot,
        image: ImageSelection,
    ) -> Result<UploadOutcome> {
        self.coordinator
            .upload_asset(self.branding(), slot.file_name(), image, move |branding, url| {
                slot.set(branding, url)
            })
            .await
    }

    pub async fn check_storage_health(&self) -> StorageHealth {
        let health = self.coordinator.check_storage_health().await;
        if !health.is_ok() {
            log::warn!("Storage check failed: {}", health.message());
        }
        health
    }
}
