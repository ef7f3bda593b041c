use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to initialize and run the process: database
/// connection details, JWT configuration, bind address, worker count,
/// CORS origins, logging preference, and the credentials for the two
/// external collaborators (image host and identity provider).
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Whether the database connection must use TLS.
    pub database_require_ssl: bool,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origins for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origins: Vec<String>,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Credentials for the image-hosting collaborator.
    pub cloudinary: CloudinaryConfig,
    /// Credentials for the identity-provisioning collaborator.
    pub firebase: FirebaseConfig,
}

#[derive(Clone, Debug, Default)]
/// Cloudinary upload credentials. Uploads fail with a configuration error
/// when cloud name, key, or secret is missing.
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl CloudinaryConfig {
    pub fn is_complete(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
/// Firebase service-account credential: either an inline JSON document or a
/// path to one, plus the project id. Empty values select the local stub
/// provider at startup.
pub struct FirebaseConfig {
    pub service_account: String,
    pub project_id: String,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in days.
    pub expiration_days: i64,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// - `JWT_SECRET`: falls back to a development-only default.
    /// - `JWT_EXPIRES_DAYS`: optional, defaults to 90 days.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_EXPIRES_DAYS` is set but not a valid number.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev_secret_change_me".to_string()),
            expiration_days: env::var("JWT_EXPIRES_DAYS")
                .unwrap_or_else(|_| "90".to_string())
                .parse()
                .expect("JWT_EXPIRES_DAYS must be a valid number"),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Database: either `DATABASE_URL`, or the discrete
    /// `PGHOST`/`PGPORT`/`PGUSER`/`PGPASSWORD`/`PGDATABASE` set. TLS is
    /// required when `PGSSLMODE=require` or `ENVIRONMENT=production`.
    ///
    /// Optional (with defaults): `IP` (127.0.0.1), `PORT` (3000), `WORKERS`
    /// (4), `ALLOWED_ORIGINS` (comma list, localhost:3000 + localhost:5173),
    /// `ENABLE_CONSOLE_LOGGING` (true), `JWT_SECRET`, `JWT_EXPIRES_DAYS`.
    ///
    /// Collaborators: `CLOUDINARY_CLOUD_NAME`/`CLOUDINARY_API_KEY`/
    /// `CLOUDINARY_API_SECRET`/`CLOUDINARY_FOLDER`, and
    /// `FIREBASE_SERVICE_ACCOUNT` (inline JSON or path) +
    /// `FIREBASE_PROJECT_ID`.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("PGPORT").unwrap_or_else(|_| "5432".to_string());
            let user = env::var("PGUSER").unwrap_or_else(|_| "postgres".to_string());
            let password = env::var("PGPASSWORD").unwrap_or_else(|_| "postgres".to_string());
            let database = env::var("PGDATABASE").unwrap_or_else(|_| "company_db".to_string());
            format!("postgresql://{user}:{password}@{host}:{port}/{database}")
        });

        let database_require_ssl = env::var("PGSSLMODE")
            .map(|mode| mode == "require")
            .unwrap_or(false)
            || environment == "production";

        Arc::new(Config {
            environment,
            database_url,
            database_require_ssl,
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:3000".to_string(),
                        "http://localhost:5173".to_string(),
                    ]
                }),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                api_key: env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
                api_secret: env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
                folder: env::var("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|_| "company-module".to_string()),
            },
            firebase: FirebaseConfig {
                service_account: env::var("FIREBASE_SERVICE_ACCOUNT").unwrap_or_default(),
                project_id: env::var("FIREBASE_PROJECT_ID").unwrap_or_default(),
            },
        })
    }
}
