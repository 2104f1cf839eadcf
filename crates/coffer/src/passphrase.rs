// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer passphrase change` and `coffer decrypt`.

use coffer_config::CofferConfig;
use coffer_core::CofferError;
use coffer_vault::prompt::NEW_ACCESS_CODE_ENV_VAR;
use coffer_vault::{get_access_code, get_access_code_with_confirm};

use crate::output::Output;
use crate::vault::open_with;

/// Re-encrypt every collection under a new access code.
///
/// The current code comes from `COFFER_ACCESS_CODE` or a prompt, the new one
/// from `COFFER_NEW_ACCESS_CODE` or two prompts.
pub fn run_change(config: &CofferConfig, out: Output) -> Result<(), CofferError> {
    let old = get_access_code()?;
    let mut coffer = open_with(config, Some(&old))?;
    let (new, confirm) = get_access_code_with_confirm(NEW_ACCESS_CODE_ENV_VAR, "New access code")?;
    coffer.change_passphrase(&old, &new, &confirm)?;
    out.done("access code changed");
    Ok(())
}

/// Verify the access code, then write every collection back as plaintext.
pub fn run_decrypt(config: &CofferConfig, out: Output) -> Result<(), CofferError> {
    let code = get_access_code()?;
    let mut coffer = open_with(config, Some(&code))?;
    coffer.decrypt()?;
    out.done("collections decrypted to plaintext");
    Ok(())
}
