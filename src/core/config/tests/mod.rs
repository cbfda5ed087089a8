// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Configuration parsing tests

use super::*;
use crate::core::error::EmulatorError;
use std::io::Write;

#[test]
fn test_empty_config_uses_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.gpu.vram_width, 1024);
    assert_eq!(config.gpu.vram_height, 512);
    assert_eq!(config.gpu.dispatch, DispatchMode::Serial);
    assert_eq!(config.dma.max_chain_hops, DEFAULT_MAX_CHAIN_HOPS);
    assert_eq!(config.log_filter().unwrap(), LevelFilter::Info);
}

#[test]
fn test_partial_config() {
    let config = Config::from_toml_str(
        r#"
        [gpu]
        dispatch = "parallel"
        workers = 8

        [log]
        level = "trace"
        "#,
    )
    .unwrap();

    assert_eq!(config.gpu.dispatch, DispatchMode::Parallel);
    assert_eq!(config.gpu.workers, 8);
    assert_eq!(config.gpu.vram_width, 1024);
    assert_eq!(config.log_filter().unwrap(), LevelFilter::Trace);
}

#[test]
fn test_zero_dimension_rejected() {
    let err = Config::from_toml_str("[gpu]\nvram_height = 0\n").unwrap_err();
    assert!(matches!(
        err,
        EmulatorError::Config(ConfigError::InvalidValue {
            field: "gpu.vram_height",
            ..
        })
    ));
}

#[test]
fn test_zero_hop_limit_rejected() {
    let err = Config::from_toml_str("[dma]\nmax_chain_hops = 0\n").unwrap_err();
    assert!(matches!(
        err,
        EmulatorError::Config(ConfigError::InvalidValue {
            field: "dma.max_chain_hops",
            ..
        })
    ));
}

#[test]
fn test_unknown_log_level_rejected() {
    let err = Config::from_toml_str("[log]\nlevel = \"loud\"\n").unwrap_err();
    assert!(matches!(
        err,
        EmulatorError::Config(ConfigError::InvalidValue {
            field: "log.level",
            ..
        })
    ));
}

#[test]
fn test_unknown_dispatch_mode_is_parse_error() {
    let err = Config::from_toml_str("[gpu]\ndispatch = \"gpu\"\n").unwrap_err();
    assert!(matches!(err, EmulatorError::Config(ConfigError::Toml(_))));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[gpu]\nvram_width = 256\nvram_height = 128").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.gpu.vram_width, 256);
    assert_eq!(config.gpu.vram_height, 128);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, EmulatorError::Io(_)));
}
