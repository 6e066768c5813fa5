// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Converts rust targets of a GN build graph into Android.bp modules.

pub mod blueprint;
pub mod desc;
pub mod generate;
pub mod rust_flags;
