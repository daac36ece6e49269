//! CLI runner - executes commands

use crate::api::{InstructorApi, PaymentApi, UploadFile, UploadTarget, Uploader};
use crate::auth::Navigator;
use crate::cli::commands::{Cli, Commands};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{ApiRequest, HttpClient};
use crate::types::{ApiScope, Method};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Prints login redirects for the terminal user
struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect(&self, target: &str) {
        eprintln!("Session ended, please log in again ({target})");
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = Arc::new(self.build_client()?);

        match &self.cli.command {
            Commands::Request {
                method,
                path,
                scope,
                data,
            } => {
                self.request(&client, *method, path, *scope, data.as_deref())
                    .await
            }
            Commands::Courses => {
                let courses = InstructorApi::new(client).list_courses().await?;
                print_json(&courses)
            }
            Commands::Upload {
                kind,
                file,
                module,
                lesson,
            } => {
                let target = UploadTarget {
                    kind: *kind,
                    module_index: *module,
                    lesson_index: *lesson,
                };
                let file = UploadFile::from_path(file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let uploaded = Uploader::new(client)?.upload(target, &file).await?;
                print_json(&uploaded)
            }
            Commands::Invoice { payment_id } => {
                let invoice = PaymentApi::new(client).get_invoice(payment_id).await?;
                print_json(&invoice)
            }
            Commands::Refresh => {
                if client.refresh().await? {
                    println!("Session refreshed");
                } else {
                    println!("A refresh is already in progress");
                }
                Ok(())
            }
        }
    }

    /// Load config (file, then env, then `--server`) and build the client
    fn build_client(&self) -> Result<HttpClient> {
        let mut config = ClientConfig::load(self.cli.config.as_deref())?;

        if let Some(ref server) = self.cli.server {
            let overrides = ClientConfig::builder().server(server).build();
            config.api_base_url = overrides.api_base_url;
            config.user_base_url = overrides.user_base_url;
            config.admin_base_url = overrides.admin_base_url;
            config.validate()?;
        }

        debug!(?config, "Client configuration");
        Ok(HttpClient::new(config)?.with_navigator(Arc::new(CliNavigator)))
    }

    async fn request(
        &self,
        client: &HttpClient,
        method: Method,
        path: &str,
        scope: ApiScope,
        data: Option<&str>,
    ) -> Result<()> {
        let mut request = ApiRequest::new(method.into(), path).scope(scope);
        if let Some(data) = data {
            let body: serde_json::Value = serde_json::from_str(data).context("Invalid --data JSON")?;
            request = request.json(body);
        }

        let response = client.send(request).await?;
        match response.json_value() {
            Some(body) => print_json(&body),
            None => {
                println!("{}", response.text_lossy());
                Ok(())
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(Error::JsonParse)?;
    println!("{out}");
    Ok(())
}
