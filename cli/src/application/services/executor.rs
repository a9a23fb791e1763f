//! Application service: install-once-then-run pipeline for a resolved command.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;
use std::process::ExitStatus;

use sd_cmd_common::{CommandSpec, Format, HabitatMode};

use crate::application::ports::{ArtifactCache, ArtifactStore, CommandRunner, StdinMode};
use crate::domain::error::CmdError;

/// Location of the habitat binary on build hosts.
pub const HAB_PATH: &str = "/hab/bin/hab";

/// How a resolved spec is run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// Run the cached file directly.
    Binary,
    /// `hab pkg install <package>` then `hab pkg exec`.
    HabitatRemote { package: String, command: String },
    /// Cache the `.hart` archive, `hab pkg install <archive>`, then `hab pkg exec`.
    HabitatLocal { package: String, command: String },
}

/// Runs one resolved command, installing its artifact first if needed.
pub struct Executor<'a, S, C, R> {
    spec: &'a CommandSpec,
    target: Target,
    store: &'a S,
    cache: &'a C,
    runner: &'a R,
    hab_path: PathBuf,
}

impl<'a, S, C, R> Executor<'a, S, C, R>
where
    S: ArtifactStore,
    C: ArtifactCache,
    R: CommandRunner,
{
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for docker commands.
    pub fn new(
        spec: &'a CommandSpec,
        store: &'a S,
        cache: &'a C,
        runner: &'a R,
    ) -> Result<Self, CmdError> {
        let target = match &spec.format {
            Format::Binary { .. } => Target::Binary,
            Format::Habitat { habitat } => match habitat.mode {
                HabitatMode::Remote => Target::HabitatRemote {
                    package: habitat.package.clone(),
                    command: habitat.command.clone(),
                },
                HabitatMode::Local => Target::HabitatLocal {
                    package: habitat.package.clone(),
                    command: habitat.command.clone(),
                },
            },
            Format::Docker { .. } => {
                return Err(CmdError::UnsupportedFormat("docker".to_string()));
            }
        };
        Ok(Self {
            spec,
            target,
            store,
            cache,
            runner,
            hab_path: PathBuf::from(HAB_PATH),
        })
    }

    #[must_use]
    pub fn with_hab_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hab_path = path.into();
        self
    }

    /// Install if needed, then run with `args`.
    ///
    /// A non-zero exit of the command is returned as `Ok`; only failures to
    /// fetch, install or spawn are errors.
    ///
    /// # Errors
    ///
    /// Returns the fetch, install or spawn failure. No process is started
    /// once fetch or install has failed.
    pub async fn run(&self, args: &[String], stdin: StdinMode) -> Result<ExitStatus, CmdError> {
        self.prepare()?.run(self.runner, args, stdin).await
    }

    /// Fetch and install the artifact if the target needs one, and return
    /// what to spawn.
    ///
    /// Blocking: Store I/O and the cache write happen on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the fetch or install failure.
    pub fn prepare(&self) -> Result<Launch, CmdError> {
        let launch = match &self.target {
            Target::Binary => Launch::Binary {
                path: self.ensure_installed()?,
            },
            Target::HabitatRemote { package, command } => Launch::Habitat {
                hab_path: self.hab_path.clone(),
                install_source: package.clone(),
                package: package.clone(),
                command: command.clone(),
            },
            Target::HabitatLocal { package, command } => Launch::Habitat {
                hab_path: self.hab_path.clone(),
                install_source: self.ensure_installed()?.to_string_lossy().into_owned(),
                package: package.clone(),
                command: command.clone(),
            },
        };
        Ok(launch)
    }

    /// Return the cached artifact path, fetching and installing it on a miss.
    fn ensure_installed(&self) -> Result<PathBuf, CmdError> {
        if self.cache.is_installed(self.spec) {
            let path = self.cache.path_for(self.spec)?;
            tracing::debug!(path = %path.display(), "command already installed");
            return Ok(path);
        }
        tracing::debug!(
            command = %self.spec.full_name(),
            version = %self.spec.version,
            "fetching artifact from store"
        );
        let artifact = self.store.fetch(self.spec)?;
        tracing::debug!(
            content_type = %artifact.content_type,
            bytes = artifact.body.len(),
            "artifact fetched"
        );
        let path = self.cache.install(self.spec, &artifact)?;
        tracing::debug!(path = %path.display(), "artifact installed");
        Ok(path)
    }
}

/// An installed command, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Run the cached file directly.
    Binary { path: PathBuf },
    /// `hab pkg install <install_source>`, then `hab pkg exec <package> <command>`.
    Habitat {
        hab_path: PathBuf,
        install_source: String,
        package: String,
        command: String,
    },
}

impl Launch {
    /// Spawn the command with `args` and wait for it.
    ///
    /// # Errors
    ///
    /// Returns the spawn failure.
    pub async fn run<R: CommandRunner>(
        &self,
        runner: &R,
        args: &[String],
        stdin: StdinMode,
    ) -> Result<ExitStatus, CmdError> {
        match self {
            Self::Binary { path } => {
                tracing::debug!(path = %path.display(), ?args, "executing binary command");
                runner.run_status(path, args, stdin).await
            }
            Self::Habitat {
                hab_path,
                install_source,
                package,
                command,
            } => {
                let install_args = hab_install_args(install_source);
                tracing::debug!(hab = %hab_path.display(), ?install_args, "installing habitat package");
                let status = runner
                    .run_status(hab_path, &install_args, StdinMode::Null)
                    .await?;
                if !status.success() {
                    tracing::warn!(%package, ?status, "habitat package install failed");
                    return Ok(status);
                }

                let exec_args = hab_exec_args(package, command, args);
                tracing::debug!(hab = %hab_path.display(), ?exec_args, "executing habitat command");
                runner.run_status(hab_path, &exec_args, stdin).await
            }
        }
    }
}

fn hab_install_args(source: &str) -> Vec<String> {
    vec!["pkg".to_string(), "install".to_string(), source.to_string()]
}

fn hab_exec_args(package: &str, command: &str, args: &[String]) -> Vec<String> {
    let mut out = vec![
        "pkg".to_string(),
        "exec".to_string(),
        package.to_string(),
        command.to_string(),
    ];
    out.extend(args.iter().cloned());
    out
}
