pub struct Construct {
    app_name: String,
}

static CONSTRUCT_STATIC: std::sync::OnceLock<ConstructStatic> = std::sync::OnceLock::new();

struct ConstructStatic {}

impl ConstructStatic {
    fn init(app_name: &str) -> &'static Self {
        construct_profiling::profile_function!();

        CONSTRUCT_STATIC.get_or_init(|| {
            env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .init();

            log::info!("{} starting", app_name);

            Self {}
        })
    }
}

impl Construct {
    /// Sets up process-wide services. Only the first call initializes logging.
    pub fn new(app_name: &str) -> Self {
        ConstructStatic::init(app_name);

        Self {
            app_name: app_name.to_owned(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}
