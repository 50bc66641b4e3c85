use clap::{Parser, Subcommand};
use runctl_common::{
    backend::KubectlBackend, kubernetes::Kubectl, prelude::*,
    tracing_support::initialize_tracing,
};
use std::{env, ffi::OsString, io, path::PathBuf};

use crate::prompt::{Prompt, TerminalPrompt};

mod age;
mod cmd;
mod description;
mod jsonpath;
mod lister;
mod printer;
mod prompt;
mod selection;
mod status;
mod table;

/// Command-line options, parsed using `clap`.
#[derive(Debug, Parser)]
#[command(
    name = "runctl",
    version,
    about = "A tool for inspecting PipelineRuns and EventListeners on Kubernetes."
)]
struct Opt {
    /// The kubeconfig context to use.
    #[arg(long, global = true)]
    context: Option<String>,

    /// The kubeconfig file to use.
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// The `kubectl` binary to run.
    #[arg(
        long,
        env = "RUNCTL_KUBECTL",
        default_value = "kubectl",
        hide = true,
        global = true
    )]
    kubectl: OsString,

    #[command(subcommand)]
    cmd: KindOpt,
}

/// The kind of resource to work with.
#[derive(Debug, Subcommand)]
enum KindOpt {
    /// PipelineRun-related commands.
    #[command(name = "pipelinerun", visible_alias = "pr")]
    PipelineRun {
        #[command(subcommand)]
        cmd: cmd::Opt,
    },

    /// EventListener-related commands.
    #[command(name = "eventlistener", visible_alias = "el")]
    EventListener {
        #[command(subcommand)]
        cmd: cmd::Opt,
    },
}

runctl_common::quick_main!(run);

fn run() -> Result<()> {
    initialize_tracing();
    let opt = Opt::parse();
    debug!("Args: {:?}", opt);

    let kubectl = Kubectl::new(opt.kubectl.clone())
        .with_context(opt.context.clone())
        .with_kubeconfig(opt.kubeconfig.clone());
    let backend = KubectlBackend::new(kubectl);
    let session = cmd::Session {
        backend: &backend,
        // The only time we look at the clock.
        now: Utc::now(),
        fuzzy: env::var_os("RUNCTL_USE_FZF").is_some(),
    };

    // Menus go to stderr, so that only results reach stdout.
    let stdin = io::stdin();
    let mut prompt = TerminalPrompt::new(stdin.lock(), io::stderr());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&session, &opt.cmd, &mut prompt, &mut out)
}

/// Run the command selected by `opt`.
fn execute(
    session: &cmd::Session<'_>,
    opt: &KindOpt,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<()> {
    match opt {
        KindOpt::PipelineRun { cmd } => {
            cmd::run(session, ResourceKind::PipelineRun, cmd, prompt, out)
        }
        KindOpt::EventListener { cmd } => {
            cmd::run(session, ResourceKind::EventListener, cmd, prompt, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use runctl_common::{backend::InMemoryBackend, chrono::Duration};

    use super::*;

    fn listener(
        now: DateTime<Utc>,
        namespace: &str,
        name: &str,
        age: Option<Duration>,
    ) -> Value {
        let mut factory = ObjectFactory::new(ResourceKind::EventListener, namespace, name)
            .condition(Condition::new(ConditionStatus::True));
        if let Some(age) = age {
            factory = factory.created_at(now - age);
        }
        factory.build()
    }

    fn backend(now: DateTime<Utc>) -> InMemoryBackend {
        let objects = vec![
            listener(now, "bar", "tb0", Some(Duration::minutes(2))),
            listener(now, "foo", "tb1", Some(Duration::minutes(2))),
            listener(now, "foo", "tb2", Some(Duration::seconds(30))),
            listener(now, "foo", "tb3", Some(Duration::hours(200))),
            listener(now, "foo", "tb4", None),
            listener(now, "foo", "tb5", Some(Duration::seconds(10))),
            listener(now, "foo", "tb6", None),
            ObjectFactory::new(ResourceKind::PipelineRun, "foo", "build-1")
                .created_at(now - Duration::minutes(5))
                .condition(Condition::new(ConditionStatus::Unknown))
                .build(),
        ];
        objects.into_iter().fold(
            InMemoryBackend::new()
                .with_current_namespace("foo")
                .with_namespace("foo")
                .with_namespace("bar")
                .with_namespace("empty"),
            |backend, object| {
                let kind = if object["kind"] == "PipelineRun" {
                    ResourceKind::PipelineRun
                } else {
                    ResourceKind::EventListener
                };
                backend.with_object(kind, object)
            },
        )
    }

    /// Run `args` against the test backend, answering prompts with `input`.
    fn run_with_input(args: &[&str], input: &str) -> Result<String> {
        let now = Utc::now();
        let backend = backend(now);
        let session = cmd::Session {
            backend: &backend,
            now,
            fuzzy: false,
        };
        let args = Some("runctl").into_iter().chain(args.iter().copied());
        let opt = Opt::try_parse_from(args)?;
        let mut prompt = TerminalPrompt::new(input.as_bytes(), io::sink());
        let mut out = vec![];
        execute(&session, &opt.cmd, &mut prompt, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn run_args(args: &[&str]) -> Result<String> {
        run_with_input(args, "")
    }

    fn first_words(text: &str) -> Vec<&str> {
        text.lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect()
    }

    #[test]
    fn list_in_an_invalid_namespace() {
        let err = run_args(&["eventlistener", "list", "-n", "invalid"]).unwrap_err();
        assert_eq!(err.to_string(), "namespace invalid not found");
    }

    #[test]
    fn list_in_an_empty_namespace() {
        assert_eq!(
            run_args(&["el", "ls", "-n", "empty"]).unwrap(),
            "No EventListeners found\n",
        );
        assert_eq!(
            run_args(&["el", "ls", "-n", "empty", "--no-headers"]).unwrap(),
            "No EventListeners found\n",
        );
    }

    #[test]
    fn list_multiple_listeners_newest_first() {
        let text = run_args(&["el", "ls"]).unwrap();
        assert_eq!(
            first_words(&text),
            &["NAME", "tb5", "tb2", "tb1", "tb3", "tb4", "tb6"],
        );
        let tb3 = text.lines().find(|l| l.starts_with("tb3")).unwrap();
        assert_eq!(
            tb3.split_whitespace().collect::<Vec<_>>(),
            &["tb3", "8d", "True"],
        );
    }

    #[test]
    fn list_without_headers() {
        let text = run_args(&["el", "ls", "-n", "bar", "--no-headers"]).unwrap();
        assert_eq!(first_words(&text), &["tb0"]);
    }

    #[test]
    fn list_all_namespaces() {
        let text = run_args(&["el", "ls", "-A"]).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            &["NAME", "NAMESPACE", "URL", "AGE", "CONDITIONS"],
        );
        assert_eq!(
            first_words(&text),
            &["NAME", "tb5", "tb2", "tb0", "tb1", "tb3", "tb4", "tb6"],
        );
        assert!(lines[3].contains("bar"));
    }

    #[test]
    fn list_names() {
        assert_eq!(
            run_args(&["el", "ls", "-n", "bar", "-o", "name"]).unwrap(),
            "eventlistener.triggers.tekton.dev/tb0\n",
        );
    }

    #[test]
    fn list_with_a_jsonpath_template() {
        let template = r#"jsonpath={range .items[*]}{.metadata.name}{"\n"}{end}"#;
        assert_eq!(
            run_args(&["el", "ls", "-n", "foo", "-o", template]).unwrap(),
            "tb5\ntb2\ntb1\ntb3\ntb4\ntb6\n",
        );
    }

    #[test]
    fn list_arguments_are_validated() {
        assert!(run_args(&["el", "ls", "-n", "foo", "-A"]).is_err());
        assert!(run_args(&["el", "ls", "-o", "wide"]).is_err());
    }

    #[test]
    fn describe_by_name() {
        let text = run_args(&["pr", "desc", "build-1", "-o", "json"]).unwrap();
        let object: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(object["metadata"]["name"], "build-1");
    }

    #[test]
    fn describe_last() {
        // tb5 is the newest, though the backend lists it fifth.
        let text = run_args(&["el", "describe", "--last"]).unwrap();
        assert!(text.contains("tb5"));
        assert!(text.contains("10s"));

        let text = run_args(&["el", "describe", "--last", "-n", "bar"]).unwrap();
        assert!(text.contains("tb0"));
        assert!(text.contains("2m"));
    }

    #[test]
    fn describe_last_in_an_empty_namespace() {
        assert_eq!(
            run_args(&["el", "describe", "-L", "-n", "empty"]).unwrap(),
            "No EventListeners present in namespace empty\n",
        );
    }

    #[test]
    fn describe_with_a_prompt() {
        // We offer the three newest: tb5, tb2 and tb1.
        let text = run_with_input(
            &["el", "describe", "--limit", "3", "-o", "name"],
            "2\n",
        )
        .unwrap();
        assert_eq!(text, "eventlistener.triggers.tekton.dev/tb2\n");

        let text =
            run_with_input(&["el", "describe", "-F", "-o", "name"], "tb3\n").unwrap();
        assert_eq!(text, "eventlistener.triggers.tekton.dev/tb3\n");

        let err = run_args(&["el", "describe"]).unwrap_err();
        assert_eq!(err.to_string(), "no EventListener selected");
    }

    #[test]
    fn describe_with_a_bad_limit() {
        let err = run_args(&["el", "describe", "--limit", "0"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CliError>(),
            Some(&CliError::InvalidLimit { limit: 0 }),
        );
    }
}
