// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access-code acquisition via TTY prompt or environment variables.

use coffer_core::CofferError;
use secrecy::SecretString;

/// The environment variable name for providing the access code.
pub const ACCESS_CODE_ENV_VAR: &str = "COFFER_ACCESS_CODE";

/// The environment variable name for providing a replacement access code.
pub const NEW_ACCESS_CODE_ENV_VAR: &str = "COFFER_NEW_ACCESS_CODE";

fn from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|code| !code.is_empty())
}

fn read_hidden(label: &str) -> Result<String, CofferError> {
    eprint!("{label}: ");
    rpassword::read_password()
        .map_err(|e| CofferError::Validation(format!("failed to read access code: {e}")))
}

fn not_available(var: &str) -> CofferError {
    CofferError::Validation(format!(
        "no access code provided. Set {var} or run interactively."
    ))
}

/// Get the access code from the environment or an interactive prompt.
///
/// Priority:
/// 1. `COFFER_ACCESS_CODE` environment variable (for scripts)
/// 2. Hidden TTY prompt via `rpassword`
pub fn get_access_code() -> Result<SecretString, CofferError> {
    if let Some(code) = from_env(ACCESS_CODE_ENV_VAR) {
        return Ok(SecretString::from(code));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let code = read_hidden("Access code")?;
        if code.is_empty() {
            return Err(CofferError::Validation("empty access code not allowed".to_string()));
        }
        return Ok(SecretString::from(code));
    }

    Err(not_available(ACCESS_CODE_ENV_VAR))
}

/// Prompt for a new access code twice and return both entries.
///
/// The caller compares them. `env_var` is consulted first and yields the
/// same code twice; `label` names what is being asked for, e.g.
/// "New access code".
pub fn get_access_code_with_confirm(
    env_var: &str,
    label: &str,
) -> Result<(SecretString, SecretString), CofferError> {
    if let Some(code) = from_env(env_var) {
        return Ok((SecretString::from(code.clone()), SecretString::from(code)));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read_hidden(label)?;
        let second = read_hidden(&format!("Confirm {}", label.to_lowercase()))?;
        return Ok((SecretString::from(first), SecretString::from(second)));
    }

    Err(not_available(env_var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn get_access_code_from_env_var() {
        // SAFETY: test-only env mutation, serialized with other env tests.
        unsafe { std::env::set_var(ACCESS_CODE_ENV_VAR, "1234") };
        let result = get_access_code();
        unsafe { std::env::remove_var(ACCESS_CODE_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "1234");
    }

    #[test]
    #[serial]
    fn confirm_variant_returns_env_code_twice() {
        unsafe { std::env::set_var(NEW_ACCESS_CODE_ENV_VAR, "abcd") };
        let result = get_access_code_with_confirm(NEW_ACCESS_CODE_ENV_VAR, "New access code");
        unsafe { std::env::remove_var(NEW_ACCESS_CODE_ENV_VAR) };

        let (code, confirm) = result.unwrap();
        assert_eq!(code.expose_secret(), confirm.expose_secret());
    }

    #[test]
    #[serial]
    fn empty_env_var_is_ignored() {
        unsafe { std::env::set_var(ACCESS_CODE_ENV_VAR, "") };
        let code = from_env(ACCESS_CODE_ENV_VAR);
        unsafe { std::env::remove_var(ACCESS_CODE_ENV_VAR) };

        assert!(code.is_none());
    }
}
