use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder, Response, multipart};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "file-vault-cli")]
#[command(about = "CLI for interacting with the file vault server", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "FILE_VAULT_URL", default_value = "http://localhost:5000")]
    url: String,

    /// User identity sent with every request
    #[arg(long, env = "FILE_VAULT_USER")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a file, creating a new version
    Upload {
        /// Local file to upload
        path: PathBuf,
        /// Content type to record (guessed by the server when omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Name to store the file under (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List current files
    List,

    /// Download a file through a signed link
    Download {
        /// File name
        name: String,
        /// Specific version to fetch
        #[arg(long)]
        version: Option<String>,
        /// Output path (defaults to the file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a file, keeping its history
    Delete {
        /// File name
        name: String,
    },

    /// List the versions of a file
    Versions {
        /// File name
        name: String,
    },

    /// Make an earlier version current again
    Restore {
        /// File name
        name: String,
        /// Version to restore
        version_id: String,
    },
}

struct VaultClient {
    http: Client,
    base_url: String,
    user: String,
}

impl VaultClient {
    fn new(base_url: &str, user: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/files{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("x-user-id", &self.user)
    }

    async fn upload(&self, path: &PathBuf, name: Option<String>, mime: Option<String>) -> Result<Value> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file_name = match name {
            Some(name) => name,
            None => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .context("Path has no usable file name")?,
        };

        let mut part = multipart::Part::bytes(data).file_name(file_name);
        if let Some(mime) = mime {
            part = part.mime_str(&mime)?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self
            .authed(self.http.post(self.api("/upload")))
            .multipart(form)
            .send()
            .await?;
        json_body(response).await
    }

    async fn list(&self) -> Result<Value> {
        let response = self.authed(self.http.get(self.api("/list"))).send().await?;
        json_body(response).await
    }

    async fn download(&self, name: &str, version: Option<&str>) -> Result<Vec<u8>> {
        let mut request = self.authed(
            self.http
                .get(self.api(&format!("/download/{}", urlencoding::encode(name)))),
        );
        if let Some(version) = version {
            request = request.query(&[("versionId", version)]);
        }

        let link = json_body(request.send().await?).await?;
        let url = link
            .get("url")
            .and_then(Value::as_str)
            .context("Response carried no download URL")?;

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            bail!("Download failed with status {}", response.status());
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn delete(&self, name: &str) -> Result<Value> {
        let response = self
            .authed(
                self.http
                    .delete(self.api(&format!("/delete/{}", urlencoding::encode(name)))),
            )
            .send()
            .await?;
        json_body(response).await
    }

    async fn versions(&self, name: &str) -> Result<Value> {
        let response = self
            .authed(
                self.http
                    .get(self.api(&format!("/versions/{}", urlencoding::encode(name)))),
            )
            .send()
            .await?;
        json_body(response).await
    }

    async fn restore(&self, name: &str, version_id: &str) -> Result<Value> {
        let response = self
            .authed(self.http.post(self.api(&format!(
                "/restore/{}/{}",
                urlencoding::encode(name),
                urlencoding::encode(version_id)
            ))))
            .send()
            .await?;
        json_body(response).await
    }
}

/// The JSON body of a successful response, or the server's error message
async fn json_body(response: Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .with_context(|| format!("Server returned a non-JSON body ({})", status))?;

    if !status.is_success() {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        bail!("{} ({})", message, status);
    }
    Ok(body)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = VaultClient::new(&cli.url, cli.user);

    match cli.command {
        Commands::Upload { path, mime, name } => print_json(&client.upload(&path, name, mime).await?),
        Commands::List => print_json(&client.list().await?),
        Commands::Download {
            name,
            version,
            output,
        } => {
            let data = client.download(&name, version.as_deref()).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(&name));
            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Saved {} bytes to {}", data.len(), output.display());
            Ok(())
        }
        Commands::Delete { name } => print_json(&client.delete(&name).await?),
        Commands::Versions { name } => print_json(&client.versions(&name).await?),
        Commands::Restore { name, version_id } => {
            print_json(&client.restore(&name, &version_id).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "file-vault-cli",
            "--user",
            "u1",
            "download",
            "report.pdf",
            "--version",
            "v1",
        ]);

        assert_eq!(cli.url, "http://localhost:5000");
        match cli.command {
            Commands::Download { name, version, .. } => {
                assert_eq!(name, "report.pdf");
                assert_eq!(version.as_deref(), Some("v1"));
            }
            _ => panic!("Expected download command"),
        }
    }

    #[test]
    fn test_api_paths() {
        let client = VaultClient::new("http://localhost:5000/", "u1".to_string());
        assert_eq!(client.api("/list"), "http://localhost:5000/api/files/list");
    }
}
