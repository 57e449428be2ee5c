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

use tokio::sync::oneshot;

use crate::ReplError;

/// The REPL must not draw its first prompt until setup (eg: logging) done by another
/// task has finished. This is a single use, one way signal from that task to the
/// session.
///
/// ```
/// # async fn foo() -> Result<(), lk_repl::ReplError> {
/// use lk_repl::InitBarrier;
///
/// let (init_signal, init_barrier) = InitBarrier::channel();
/// tokio::spawn(async move {
///     // Do setup work here.
///     init_signal.done();
/// });
/// init_barrier.wait().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InitBarrier {
    receiver: Option<oneshot::Receiver<()>>,
}

/// The sending half of an [`InitBarrier`]. Dropping it without calling
/// [`InitSignal::done`] aborts the barrier.
#[derive(Debug)]
pub struct InitSignal {
    sender: oneshot::Sender<()>,
}

impl InitBarrier {
    #[must_use]
    pub fn channel() -> (InitSignal, InitBarrier) {
        let (sender, receiver) = oneshot::channel();
        (
            InitSignal { sender },
            InitBarrier {
                receiver: Some(receiver),
            },
        )
    }

    /// A barrier that is already open, for when there is no setup to wait for.
    #[must_use]
    pub fn ready() -> Self { Self { receiver: None } }

    /// # Errors
    ///
    /// [`ReplError::InitAborted`] if the [`InitSignal`] was dropped without signalling.
    pub async fn wait(self) -> Result<(), ReplError> {
        let Some(receiver) = self.receiver else {
            return Ok(());
        };
        receiver.await.map_err(|_| ReplError::InitAborted)
    }
}

impl InitSignal {
    pub fn done(self) {
        if self.sender.send(()).is_err() {
            tracing::debug!("init barrier was dropped before init was done");
        }
    }
}
