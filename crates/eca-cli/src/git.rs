//! Commit metadata read through the `git` binary.

use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use eca_gate::{PersonIdent, RawCommit};

// hash, parents, author name/mail, committer name/mail, subject, raw body.
// `format:` has separator semantics, so nothing is appended after the body.
const FORMAT: &str = "--pretty=format:%H%x00%P%x00%an%x00%ae%x00%cn%x00%ce%x00%s%x00%B";

fn run(repo: &Path, args: &[&str]) -> Result<String> {
    let out = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .with_context(|| format!("run git {:?}", args))?;
    if !out.status.success() {
        return Err(anyhow!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

/// Read `rev` from the repository at `repo`.
pub fn read_commit(repo: &Path, rev: &str) -> Result<RawCommit> {
    let out = run(repo, &["show", "-s", FORMAT, rev])?;
    parse_show(&out)
}

fn ident(name: &str, email: &str) -> PersonIdent {
    PersonIdent {
        name: (!name.is_empty()).then(|| name.to_string()),
        email: (!email.is_empty()).then(|| email.to_string()),
    }
}

fn parse_show(out: &str) -> Result<RawCommit> {
    let fields: Vec<&str> = out.splitn(8, '\0').collect();
    let [hash, parents, author_name, author_mail, committer_name, committer_mail, subject, body] =
        fields[..]
    else {
        return Err(anyhow!("unexpected git show output: {:?}", out));
    };

    let parents = parents.split_whitespace().map(str::to_string).collect();
    let mut commit = RawCommit::new(hash.trim(), body, ident(author_name, author_mail))
        .with_parents(parents)
        .with_committer(ident(committer_name, committer_mail));
    // git's subject joins the first paragraph; the body is kept verbatim
    commit.short_message = Some(subject.to_string());

    Ok(commit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eca_gate::CommitInfo;

    #[test]
    fn parses_show_output() {
        let out = "abc123\0p1 p2\0Jane Doe\0jane@example.org\0Bot\0\0Fix build\0Fix build\n\nSigned-off-by: Jane\n";
        let commit = parse_show(out).unwrap();

        assert_eq!(commit.hash(), "abc123");
        assert_eq!(commit.parent_hashes(), vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(commit.short_message(), Some("Fix build"));
        assert_eq!(
            commit.full_message(),
            Some("Fix build\n\nSigned-off-by: Jane\n")
        );
        assert_eq!(commit.author().name.as_deref(), Some("Jane Doe"));
        assert_eq!(commit.committer().name.as_deref(), Some("Bot"));
        assert_eq!(commit.committer().email, None);
    }

    #[test]
    fn subject_comes_from_git_not_first_body_line() {
        let out = "abc123\0\0Jane\0j@x.org\0Jane\0j@x.org\0Fix the build on a long wrapped line\0Fix the build\non a long wrapped line\n\nDetails\n";
        let commit = parse_show(out).unwrap();

        assert_eq!(
            commit.short_message(),
            Some("Fix the build on a long wrapped line")
        );
        assert!(commit.full_message().unwrap().ends_with("Details\n"));
    }

    #[test]
    fn root_commit_has_no_parents() {
        let out = "abc123\0\0Jane\0j@x.org\0Jane\0j@x.org\0Initial\0Initial\n";
        assert!(parse_show(out).unwrap().parents.is_empty());
    }

    #[test]
    fn rejects_truncated_output() {
        assert!(parse_show("abc123\0p1").is_err());
    }
}
