/*
 *   Copyright (c) 2024-2025 R3BL LLC
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

use std::pin::Pin;

use futures_core::Stream;

pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;

/// Turn a [Vec] of items into an async stream that yields them in order and then ends.
/// This stands in for `crossterm::event::EventStream` in tests.
pub fn gen_input_stream<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = async_stream::stream! {
        for item in generator_vec {
            yield item;
        }
    };
    Box::pin(it)
}
