//! Tools for talking to Kubernetes.

use serde::de::DeserializeOwned;
use std::{
    ffi::OsString,
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::prelude::*;

/// Namespace used when the current context doesn't name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// How to invoke `kubectl`: which binary, and which cluster it should talk to.
#[derive(Clone, Debug)]
pub struct Kubectl {
    /// The `kubectl` binary to run.
    program: OsString,
    /// Passed as `--context`.
    context: Option<String>,
    /// Passed as `--kubeconfig`.
    kubeconfig: Option<PathBuf>,
}

impl Default for Kubectl {
    fn default() -> Self {
        Kubectl::new("kubectl")
    }
}

impl Kubectl {
    /// Run `program` as `kubectl`, using its default cluster configuration.
    pub fn new<P: Into<OsString>>(program: P) -> Kubectl {
        Kubectl {
            program: program.into(),
            context: None,
            kubeconfig: None,
        }
    }

    /// Talk to the cluster named by this kubeconfig context.
    pub fn with_context(mut self, context: Option<String>) -> Kubectl {
        self.context = context;
        self
    }

    /// Read cluster configuration from this kubeconfig file.
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Kubectl {
        self.kubeconfig = kubeconfig;
        self
    }

    /// The arguments we pass before any subcommand.
    fn global_args(&self) -> Vec<OsString> {
        let mut args = vec![];
        if let Some(context) = &self.context {
            args.push("--context".into());
            args.push(context.into());
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".into());
            args.push(kubeconfig.into());
        }
        args
    }

    /// Build a `Command` for `args`.
    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.global_args()).args(args);
        command
    }

    /// Run `kubectl`, capturing standard output.
    pub fn output(&self, args: &[&str]) -> Result<Vec<u8>> {
        debug!("running kubectl {:?}", args);
        let output = self
            .command(args)
            // Pass `stderr` through on console instead of capturing.
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("error starting kubectl with {:?}", args))?;
        if !output.status.success() {
            return Err(format_err!("error running kubectl with {:?}", args));
        }
        trace!("kubectl wrote {} bytes", output.stdout.len());
        Ok(output.stdout)
    }

    /// Run `kubectl`, capture output as JSON, and parse it using the
    /// specified type.
    pub fn parse_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let stdout = self.output(args)?;
        serde_json::from_slice(&stdout)
            .with_context(|| format!("error parsing output of kubectl {:?}", args))
    }

    /// The namespace selected by the current kubeconfig context, or
    /// [`DEFAULT_NAMESPACE`] if it doesn't select one.
    pub fn current_namespace(&self) -> Result<String> {
        let stdout = self.output(&[
            "config",
            "view",
            "--minify",
            "--output",
            "jsonpath={..namespace}",
        ])?;
        let namespace = String::from_utf8(stdout)
            .context("kubectl returned a non-UTF-8 namespace")?;
        Ok(namespace_or_default(namespace.trim()))
    }
}

/// Fall back to [`DEFAULT_NAMESPACE`] if `namespace` is empty.
fn namespace_or_default(namespace: &str) -> String {
    if namespace.is_empty() {
        DEFAULT_NAMESPACE.to_owned()
    } else {
        namespace.to_owned()
    }
}

/// A Kubernetes `List` response (missing lots of fields).
#[derive(Debug, Deserialize)]
pub struct ObjectList {
    /// The objects in the list.
    #[serde(default)]
    pub items: Vec<Value>,
}

#[test]
fn global_args_come_before_subcommands() {
    let kubectl = Kubectl::default()
        .with_context(Some("staging".to_owned()))
        .with_kubeconfig(Some(PathBuf::from("/tmp/config")));
    let command = kubectl.command(&["get", "namespaces"]);
    let args = command
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(
        args,
        &[
            "--context",
            "staging",
            "--kubeconfig",
            "/tmp/config",
            "get",
            "namespaces",
        ],
    );
}

#[test]
fn empty_namespace_falls_back_to_default() {
    assert_eq!(namespace_or_default(""), "default");
    assert_eq!(namespace_or_default("ci"), "ci");
}
