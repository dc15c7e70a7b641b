use super::parsing::{env_flag, env_number, env_optional, env_or_default, parse_cors_origins};
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, Environment,
    RuntimeSettings, SecuritySettings, Settings, StorageSettings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_name(
            env_optional("EDUHUB_ENV").or_else(|| env_optional("ENVIRONMENT")).as_deref(),
        );
        let runtime = RuntimeSettings {
            environment,
            strict_config: env_flag("EDUHUB_STRICT_CONFIG")
                || environment == Environment::Production,
        };

        let settings = Self {
            host: env_or_default("EDUHUB_HOST", "0.0.0.0"),
            port: env_number("EDUHUB_PORT", "5000")?,
            runtime,
            api: ApiSettings {
                project_name: env_or_default("PROJECT_NAME", "EduHub API"),
                version: env_or_default("VERSION", env!("CARGO_PKG_VERSION")),
            },
            security: SecuritySettings {
                secret_key: env_optional("SECRET_KEY")
                    .ok_or(ConfigError::MissingSecret("SECRET_KEY"))?,
                access_token_expire_minutes: env_number("ACCESS_TOKEN_EXPIRE_MINUTES", "60")?,
                algorithm: env_or_default("ALGORITHM", "HS256"),
            },
            cors: CorsSettings {
                origins: parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?,
            },
            database: DatabaseSettings {
                url: env_optional("DATABASE_URL"),
                server: env_or_default("POSTGRES_SERVER", "localhost"),
                port: env_number("POSTGRES_PORT", "5432")?,
                user: env_or_default("POSTGRES_USER", "eduhub"),
                password: env_or_default("POSTGRES_PASSWORD", ""),
                name: env_or_default("POSTGRES_DB", "eduhub"),
            },
            storage: StorageSettings {
                content_root: env_or_default("CONTENT_ROOT", "public"),
                max_upload_size_mb: env_number("MAX_UPLOAD_SIZE_MB", "10")?,
                max_attachments: env_number("MAX_ATTACHMENTS", "10")?,
                min_cover_width: env_number("MIN_COVER_WIDTH", "850")?,
            },
            admin: AdminSettings {
                first_admin_email: env_or_default("FIRST_ADMIN_EMAIL", ""),
                first_admin_password: env_or_default("FIRST_ADMIN_PASSWORD", ""),
            },
            telemetry: TelemetrySettings {
                log_level: env_or_default("EDUHUB_LOG_LEVEL", "info"),
                json: env_flag("EDUHUB_LOG_JSON"),
                prometheus_enabled: env_flag("PROMETHEUS_ENABLED"),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.host
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.port
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn storage(&self) -> &StorageSettings {
        &self.storage
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, value: &str| ConfigError::InvalidValue {
            field,
            value: value.to_string(),
        };

        if self.host.is_empty() {
            return Err(invalid("EDUHUB_HOST", "<empty>"));
        }
        if self.port == 0 {
            return Err(invalid("EDUHUB_PORT", "0"));
        }
        if self.security.algorithm != "HS256" {
            return Err(invalid("ALGORITHM", &self.security.algorithm));
        }
        if self.security.access_token_expire_minutes == 0 {
            return Err(invalid("ACCESS_TOKEN_EXPIRE_MINUTES", "0"));
        }
        if self.storage.max_attachments == 0 {
            return Err(invalid("MAX_ATTACHMENTS", "0"));
        }

        let needs_password = self.runtime.strict_config
            && self.database.url.is_none()
            && self.database.password.is_empty();
        if needs_password {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}
