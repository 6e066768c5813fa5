// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Helpers for rewriting third-party license metadata: checked overwrites of
//! README fields and printing of METADATA blocks.

pub mod mapper;
pub mod metadata;

pub use mapper::{apply_mappers, FieldValue, Mapper, MapperError, Metadata};
pub use metadata::{render, MetadataNode, MetadataValue};
