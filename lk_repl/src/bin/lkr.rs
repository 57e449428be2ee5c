/*
 *   Copyright (c) 2024 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use clap::Parser;
use lk_repl::{CalcEvaluator, InitBarrier, RawModeGuard, ReplConfig, ReplSession,
              SOURCE_NAME};
use miette::IntoDiagnostic as _;

use crate::clap_config::CLIArgs;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_args = CLIArgs::parse();

    let repl_config = ReplConfig {
        prompt: cli_args.prompt.clone(),
        source_name: SOURCE_NAME.to_owned(),
        history_max_size: cli_args.history_size,
    };
    let maybe_tracing_config = cli_args.global_options.tracing_config();

    let evaluator = CalcEvaluator::new(Box::new(std::io::stdout()));
    let mut session = ReplSession::new_interactive(repl_config, evaluator)?;
    let _raw_mode = RawModeGuard::enable().into_diagnostic()?;

    // The first prompt is drawn only once logging is set up.
    let (init_signal, init_barrier) = InitBarrier::channel();
    let init_task = tokio::task::spawn_blocking(move || -> miette::Result<()> {
        if let Some(tracing_config) = maybe_tracing_config {
            lk_repl::init(&tracing_config)?;
            tracing::info!(?tracing_config, "lkr -> logging enabled");
        }
        init_signal.done();
        Ok(())
    });

    let session_result = session.run(init_barrier).await;

    // A failed init aborts the barrier, so report the init error first.
    init_task.await.into_diagnostic()??;
    let session_exit = session_result?;
    tracing::info!(%session_exit, "lkr -> exit");

    Ok(())
}

mod clap_config {
    use clap::{Args, Parser};
    use lk_repl::{DEFAULT_PROMPT, HISTORY_SIZE_MAX, TracingConfig, WriterArg};

    /// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
    #[derive(Debug, Parser)]
    #[command(bin_name = "lkr")]
    #[command(about = "Interactive REPL for the LK scripting language")]
    #[command(version)]
    #[command(next_line_help = true)]
    #[command(arg_required_else_help(false))]
    /// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
    #[command(
        help_template = "{about}\nVersion: {bin} {version} 💻\n\nType statements at the prompt. Blocks that span lines are submitted once they are closed.\nPress Ctrl+C or Esc to exit.\nUSAGE 📓:\n  lkr [\x1b[34moptions\x1b[0m]\n\n[options]\n{options}"
    )]
    pub struct CLIArgs {
        #[arg(long, default_value = DEFAULT_PROMPT, help = "Prompt painted before every line")]
        pub prompt: String,

        #[arg(
            long,
            default_value_t = HISTORY_SIZE_MAX,
            help = "Maximum number of lines kept in history"
        )]
        pub history_size: usize,

        #[command(flatten)]
        pub global_options: GlobalOption,
    }

    #[derive(Debug, Args)]
    pub struct GlobalOption {
        #[arg(
            global = true,
            long,
            short = 'l',
            help = "Log app output to a file named `lkr_log.txt` for debugging."
        )]
        pub enable_logging: bool,

        #[arg(global = true, long, help = "Path of the log file, implies --enable-logging")]
        pub log_file: Option<String>,

        #[arg(
            global = true,
            long,
            default_value_t = tracing::Level::DEBUG,
            help = "One of: trace, debug, info, warn, error"
        )]
        pub log_level: tracing::Level,

        #[arg(
            global = true,
            long,
            help = "Where logs go, repeat to add more: file, stdout, stderr, none. Defaults to file"
        )]
        pub log_writer: Vec<WriterArg>,
    }

    impl GlobalOption {
        /// [`None`] when logging is not enabled.
        pub fn tracing_config(&self) -> Option<TracingConfig> {
            if !self.enable_logging && self.log_file.is_none() {
                return None;
            }
            let mut it = TracingConfig::new_file(self.log_file.clone(), self.log_level);
            if !self.log_writer.is_empty() {
                it.writers.clone_from(&self.log_writer);
            }
            Some(it)
        }
    }
}
