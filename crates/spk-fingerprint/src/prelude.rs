// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

pub use super::{DigestEngine, Fingerprintable, GraphWriter};
