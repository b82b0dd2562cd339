//! # Symbolic Mode
//!
//! Compiles POSIX-chmod-style symbolic mode expressions (`"u+rwX,g=rX,o="`)
//! into absolute permission bits, given the target's current mode and whether
//! it is a directory.
//!
//! ## Expression Format
//!
//! An expression is a comma-separated list of clauses. Each clause is a
//! *target* (`u`, `g`, `o`, `a`, a combination like `ug`, or empty, which
//! means `a`) followed by one or more operator/permission pairs:
//!
//! - Operators: `+` (add bits), `-` (remove bits), `=` (replace the target
//!   class's bits).
//! - Permissions: `r`, `w`, `x`, `X` (execute only for directories or targets
//!   that already have some execute bit), `s` (setuid/setgid), `t` (sticky),
//!   and `u`/`g`/`o` (copy that class's current read/write/execute pattern).
//!
//! An expression consisting solely of octal digits (e.g. `"0755"`) is taken
//! as an absolute mode.
//!
//! ## The `X` correction
//!
//! `X` is the part naive implementations get wrong: it must be evaluated
//! against the *running* mode as mutated by earlier clauses, not the mode the
//! target had on disk. `compile` folds clauses left-to-right over a running
//! mode and re-checks the execute condition at each step.
//!
//! ## Examples
//!
//! ```rust
//! use symbolic_mode::compile;
//!
//! // Plain file without execute bits: X contributes nothing.
//! assert_eq!(compile("a+X", 0o644, false).unwrap(), 0o644);
//!
//! // Directory: X always grants execute.
//! assert_eq!(compile("a+X", 0o644, true).unwrap(), 0o755);
//!
//! // Group copies the owner's pattern.
//! assert_eq!(compile("g=u", 0o740, false).unwrap(), 0o770);
//! ```

mod error;

pub use error::ModeError;

/// Permission bits a mode expression may touch.
pub const MODE_BITS: u32 = 0o7777;

const CLASS_USER: u32 = 0o4700;
const CLASS_GROUP: u32 = 0o2070;
const CLASS_OTHER: u32 = 0o1007;
const CLASS_ALL: u32 = 0o7777;
const EXEC_BITS: u32 = 0o111;

/// How an operator combines a permission mask into the running mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Remove,
    Assign,
}

impl Op {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Remove),
            '=' => Some(Op::Assign),
            _ => None,
        }
    }
}

/// Compile a symbolic mode expression against `current` mode bits.
///
/// `current` is masked to 0–0o7777 before use; `is_dir` drives the `X`
/// conditional. Returns the absolute mode the target should have after the
/// expression is applied.
///
/// # Errors
///
/// [`ModeError`] when a clause has no operator or contains an unrecognized
/// class or permission symbol.
pub fn compile(expr: &str, current: u32, is_dir: bool) -> Result<u32, ModeError> {
    // All-digit expressions are absolute octal modes, as with chmod(1).
    if !expr.is_empty() && expr.bytes().all(|b| b.is_ascii_digit()) {
        return u32::from_str_radix(expr, 8)
            .map(|m| m & MODE_BITS)
            .map_err(|_| ModeError::InvalidOctal {
                expr: expr.to_string(),
            });
    }

    let mut mode = current & MODE_BITS;
    for clause in expr.split(',') {
        mode = apply_clause(clause, expr, mode, is_dir)?;
    }
    Ok(mode & MODE_BITS)
}

/// Apply a single clause (`target` + operator/permission pairs) to `mode`.
fn apply_clause(clause: &str, expr: &str, mode: u32, is_dir: bool) -> Result<u32, ModeError> {
    let (target, pairs) = split_clause(clause)?;
    let class = class_mask(target, expr)?;

    let mut current = mode;
    for (op, perms) in pairs {
        // `=` with an empty permission list still applies: it clears the class.
        let mut need_apply = op == Op::Assign;
        let mut mask = 0u32;

        for symbol in perms.chars() {
            match symbol {
                'r' => mask |= 0o444,
                'w' => mask |= 0o222,
                'x' => mask |= EXEC_BITS,
                // Conditional execute: checked against the live running mode,
                // not the mode the target had on disk.
                'X' => {
                    if is_dir || current & EXEC_BITS != 0 {
                        mask |= EXEC_BITS;
                    }
                }
                's' => mask |= 0o6000,
                't' => mask |= 0o1000,
                'u' | 'g' | 'o' => {
                    // Class copy. Flush any accumulated mask with the clause
                    // operator first, then assign the referenced class's
                    // current pattern into the acting class.
                    if mask != 0 {
                        current = apply_op(current, class, op, mask);
                        mask = 0;
                    }
                    need_apply = false;

                    let from = match symbol {
                        'u' => CLASS_USER,
                        'g' => CLASS_GROUP,
                        _ => CLASS_OTHER,
                    };
                    let pattern = (current & from) / (from & EXEC_BITS) * (class & EXEC_BITS);
                    current = apply_op(current, class, Op::Assign, pattern);
                }
                _ => {
                    return Err(ModeError::InvalidPermission {
                        symbol,
                        expr: expr.to_string(),
                    })
                }
            }
        }

        if mask != 0 || need_apply {
            current = apply_op(current, class, op, mask);
        }
    }
    Ok(current)
}

/// Split a clause into its target and `(operator, permissions)` pairs.
fn split_clause(clause: &str) -> Result<(&str, Vec<(Op, &str)>), ModeError> {
    let is_op = |c: char| matches!(c, '+' | '-' | '=');

    let first = clause.find(is_op).ok_or_else(|| ModeError::MissingOperator {
        clause: clause.to_string(),
    })?;
    let target = &clause[..first];
    let rest = &clause[first..];

    let mut pairs = Vec::new();
    let mut i = 0;
    while i < rest.len() {
        // Operators are single ASCII characters, so byte indexing is safe.
        let op = Op::from_char(rest[i..].chars().next().unwrap_or_default())
            .unwrap_or(Op::Add);
        let start = i + 1;
        let end = rest[start..]
            .find(is_op)
            .map(|j| start + j)
            .unwrap_or(rest.len());
        pairs.push((op, &rest[start..end]));
        i = end;
    }
    Ok((target, pairs))
}

/// Resolve a clause target into the set of bits it may modify.
fn class_mask(target: &str, expr: &str) -> Result<u32, ModeError> {
    if target.is_empty() {
        return Ok(CLASS_ALL);
    }
    target.chars().try_fold(0u32, |mask, symbol| match symbol {
        'u' => Ok(mask | CLASS_USER),
        'g' => Ok(mask | CLASS_GROUP),
        'o' => Ok(mask | CLASS_OTHER),
        'a' => Ok(mask | CLASS_ALL),
        _ => Err(ModeError::InvalidClass {
            symbol,
            expr: expr.to_string(),
        }),
    })
}

/// Combine `mask` into `mode`, restricted to the bits in `class`.
fn apply_op(mode: u32, class: u32, op: Op, mask: u32) -> u32 {
    match op {
        Op::Assign => (mode & !class) | (class & mask),
        Op::Add => mode | (class & mask),
        Op::Remove => mode & !(class & mask),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octal_expression_is_absolute() {
        assert_eq!(compile("0755", 0o640, false).unwrap(), 0o755);
        assert_eq!(compile("644", 0o777, true).unwrap(), 0o644);
    }

    #[test]
    fn octal_expression_rejects_bad_digits() {
        assert_eq!(
            compile("0968", 0o644, false),
            Err(ModeError::InvalidOctal {
                expr: "0968".into()
            })
        );
    }

    #[test]
    fn add_basic_bits() {
        assert_eq!(compile("u+x", 0o644, false).unwrap(), 0o744);
        assert_eq!(compile("g+w", 0o644, false).unwrap(), 0o664);
        assert_eq!(compile("o+r", 0o640, false).unwrap(), 0o644);
        assert_eq!(compile("a+w", 0o444, false).unwrap(), 0o666);
    }

    #[test]
    fn remove_basic_bits() {
        assert_eq!(compile("go-w", 0o666, false).unwrap(), 0o644);
        assert_eq!(compile("a-x", 0o755, true).unwrap(), 0o644);
    }

    #[test]
    fn assign_replaces_only_the_class() {
        assert_eq!(compile("g=r", 0o777, false).unwrap(), 0o747);
        // Empty right-hand side clears the class.
        assert_eq!(compile("o=", 0o777, false).unwrap(), 0o770);
        assert_eq!(compile("u=rw", 0o777, false).unwrap(), 0o677);
    }

    #[test]
    fn empty_target_means_all() {
        assert_eq!(compile("+w", 0o444, false).unwrap(), 0o666);
        assert_eq!(compile("=r", 0o777, false).unwrap(), 0o444);
    }

    #[test]
    fn multi_clause_folds_left_to_right() {
        assert_eq!(compile("u+rwX,g=rX,o=", 0o644, true).unwrap(), 0o750);
        assert_eq!(compile("a=r,u+w", 0o777, false).unwrap(), 0o644);
    }

    #[test]
    fn capital_x_on_plain_file_without_exec_is_noop() {
        assert_eq!(compile("a+X", 0o644, false).unwrap(), 0o644);
    }

    #[test]
    fn capital_x_on_directory_grants_exec() {
        assert_eq!(compile("a+X", 0o644, true).unwrap(), 0o755);
    }

    #[test]
    fn capital_x_propagates_existing_exec_bit() {
        assert_eq!(compile("a+X", 0o744, false).unwrap(), 0o755);
        // Any execute bit qualifies, not just the owner's.
        assert_eq!(compile("a+X", 0o641, false).unwrap(), 0o755);
    }

    #[test]
    fn capital_x_sees_the_running_mode() {
        // The first clause grants owner execute, so the second clause's X
        // fires even though the on-disk mode had no execute bits.
        assert_eq!(compile("u+x,a+X", 0o644, false).unwrap(), 0o755);
        // And removal in an earlier clause disarms it.
        assert_eq!(compile("a-x,a+X", 0o755, false).unwrap(), 0o644);
    }

    #[test]
    fn copy_group_from_user() {
        assert_eq!(compile("g=u", 0o740, false).unwrap(), 0o770);
        assert_eq!(compile("g=u", 0o540, false).unwrap(), 0o550);
    }

    #[test]
    fn copy_assigns_regardless_of_operator() {
        // `+` with a class copy still replaces the group pattern.
        assert_eq!(compile("g+u", 0o751, false).unwrap(), 0o771);
        assert_eq!(compile("o=g", 0o754, false).unwrap(), 0o755);
    }

    #[test]
    fn copy_flushes_accumulated_mask_first() {
        // `g=wu`: `w` accumulates, gets assigned when `u` is reached, then the
        // owner pattern overwrites the group class.
        assert_eq!(compile("g=wu", 0o700, false).unwrap(), 0o770);
    }

    #[test]
    fn setid_and_sticky_bits() {
        assert_eq!(compile("u+s", 0o755, false).unwrap(), 0o4755);
        assert_eq!(compile("g+s", 0o755, true).unwrap(), 0o2755);
        assert_eq!(compile("o+t", 0o777, true).unwrap(), 0o1777);
        assert_eq!(compile("a-st", 0o7777, true).unwrap(), 0o0777);
    }

    #[test]
    fn plus_with_empty_perms_changes_nothing() {
        assert_eq!(compile("u+", 0o644, false).unwrap(), 0o644);
        assert_eq!(compile("g-", 0o644, false).unwrap(), 0o644);
    }

    #[test]
    fn multi_character_target() {
        assert_eq!(compile("ug+x", 0o644, false).unwrap(), 0o754);
    }

    #[test]
    fn current_mode_is_clamped_to_permission_bits() {
        // File-type bits in the input must not leak through.
        assert_eq!(compile("u+w", 0o100444, false).unwrap(), 0o644);
    }

    #[test]
    fn missing_operator_is_an_error() {
        assert_eq!(
            compile("urw", 0o644, false),
            Err(ModeError::MissingOperator {
                clause: "urw".into()
            })
        );
        assert!(compile("", 0o644, false).is_err());
    }

    #[test]
    fn second_clause_errors_are_reported() {
        assert!(matches!(
            compile("u+r,gw", 0o644, false),
            Err(ModeError::MissingOperator { .. })
        ));
    }

    #[test]
    fn invalid_class_symbol() {
        assert_eq!(
            compile("z+r", 0o644, false),
            Err(ModeError::InvalidClass {
                symbol: 'z',
                expr: "z+r".into()
            })
        );
    }

    #[test]
    fn invalid_permission_symbol() {
        assert_eq!(
            compile("u+q", 0o644, false),
            Err(ModeError::InvalidPermission {
                symbol: 'q',
                expr: "u+q".into()
            })
        );
    }

    #[test]
    fn help_messages_exist_for_every_variant() {
        let errs = [
            ModeError::MissingOperator { clause: "x".into() },
            ModeError::InvalidClass {
                symbol: 'z',
                expr: "z+r".into(),
            },
            ModeError::InvalidPermission {
                symbol: 'q',
                expr: "u+q".into(),
            },
            ModeError::InvalidOctal { expr: "099".into() },
        ];
        for e in errs {
            assert!(e.help().is_some(), "no help for {e:?}");
        }
    }
}
