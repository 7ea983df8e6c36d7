// JCL builders

const DEFAULT_JOB_NAME: &str = "GOJOB";
const DEFAULT_ACCOUNT: &str = "ACCT";
const DEFAULT_PROGRAMMER: &str = "USER";
const DEFAULT_MSG_CLASS: &str = "A";
const DEFAULT_MSG_LEVEL: &str = "(1,1)";
const DEFAULT_STEP_NAME: &str = "STEP1";

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Build a JOB card. Empty arguments fall back to
/// `GOJOB`, `ACCT`, `USER`, `A` and `(1,1)`.
///
/// # Example
/// ```
/// use zosmf_core::domain::jcl::create_simple_job_statement;
///
/// assert_eq!(
///     create_simple_job_statement("TESTJOB", "ACCT", "USER", "A", "(1,1)"),
///     "//TESTJOB JOB (ACCT),'USER',MSGCLASS=A,MSGLEVEL=(1,1)"
/// );
/// ```
pub fn create_simple_job_statement(
    job_name: &str,
    account: &str,
    user: &str,
    msg_class: &str,
    msg_level: &str,
) -> String {
    format!(
        "//{} JOB ({}),'{}',MSGCLASS={},MSGLEVEL={}",
        or_default(job_name, DEFAULT_JOB_NAME),
        or_default(account, DEFAULT_ACCOUNT),
        or_default(user, DEFAULT_PROGRAMMER),
        or_default(msg_class, DEFAULT_MSG_CLASS),
        or_default(msg_level, DEFAULT_MSG_LEVEL),
    )
}

/// Build a complete job: JOB card, one EXEC step, then the DD statements,
/// each line newline-terminated.
#[allow(clippy::too_many_arguments)]
pub fn create_job_with_step(
    job_name: &str,
    account: &str,
    user: &str,
    msg_class: &str,
    msg_level: &str,
    step_name: &str,
    program: &str,
    dd_statements: &[&str],
) -> String {
    let mut jcl = create_simple_job_statement(job_name, account, user, msg_class, msg_level);
    jcl.push('\n');
    jcl.push_str(&format!(
        "//{} EXEC PGM={}\n",
        or_default(step_name, DEFAULT_STEP_NAME),
        program
    ));
    for dd in dd_statements {
        jcl.push_str(dd);
        jcl.push('\n');
    }
    jcl
}
