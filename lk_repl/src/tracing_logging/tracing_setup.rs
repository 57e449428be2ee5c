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

use tracing_subscriber::{Layer, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::{TracingConfig, WriterConfig};

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Initialize the global tracing subscriber with the provided [`TracingConfig`]. If
/// the config has no writers, this does nothing.
///
/// # Errors
///
/// If the log file can't be created, or a global subscriber is already set.
pub fn init(tracing_config: &TracingConfig) -> miette::Result<()> {
    if let Some(layers) = try_create_layers(tracing_config)? {
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|err| miette::miette!("Can't initialize tracing: {err}"))?;
    }
    Ok(())
}

/// Returns the layers. This does not initialize the tracing system. Once you have the
/// layers, you can run the following:
/// `try_create_layers(..)?.map(|layers| tracing_subscriber::registry().with(layers).init());`
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    // Transform the `clap` crate's parsed command line arguments into a `WriterConfig`.
    let Some(writer_config) = WriterConfig::from_writers(&tracing_config.writers) else {
        return Ok(None);
    };

    let level_filter = tracing_config.get_level_filter();

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Set the level filter for the whole registry, in addition to the filter on each
    // layer.
    return_it.push(Box::new(level_filter));

    if let Some(layer) = writer_config
        .create_display_layer(level_filter, tracing_config.get_display_preference())
    {
        return_it.push(layer);
    }

    if let Some(layer) = writer_config.try_create_file_layer(
        level_filter,
        &tracing_config.tracing_log_file_path_and_prefix,
    )? {
        return_it.push(layer);
    }

    Ok(Some(return_it))
}
