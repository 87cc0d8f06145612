use super::*;

#[test]
fn test_repository_handle_parses_owner_and_name() {
    let handle: RepositoryHandle = "Cowgirl-AI/cgai-landing-page".parse().unwrap();

    assert_eq!(handle.owner(), "Cowgirl-AI");
    assert_eq!(handle.name(), "cgai-landing-page");
    assert_eq!(handle.full_name(), "Cowgirl-AI/cgai-landing-page");
    assert_eq!(handle.to_string(), "Cowgirl-AI/cgai-landing-page");
}

#[test]
fn test_repository_handle_trims_surrounding_whitespace() {
    let handle: RepositoryHandle = "  octo/repo \n".parse().unwrap();
    assert_eq!(handle.full_name(), "octo/repo");
}

#[test]
fn test_repository_handle_rejects_malformed_input() {
    for input in ["", "octo", "/repo", "octo/", "octo/repo/extra", " / "] {
        let result = input.parse::<RepositoryHandle>();
        assert!(
            matches!(result, Err(ImproverError::ConfigurationError { .. })),
            "expected '{input}' to be rejected"
        );
    }
}

#[test]
fn test_branch_name_rejects_empty_and_builds_ref() {
    assert!(BranchName::new("").is_none());

    let branch = BranchName::new("code-improvements-20240101120000").unwrap();
    assert_eq!(branch.to_ref(), "refs/heads/code-improvements-20240101120000");
}

#[test]
fn test_repo_path_extension_matching() {
    let path = RepoPath::new("src/app/main.py").unwrap();

    assert!(path.has_extension(".py"));
    assert!(!path.has_extension(".rs"));
    assert!(!path.has_extension(""));
    assert!(!RepoPath::new("notes.pyc").unwrap().has_extension(".py"));
}

#[test]
fn test_repo_path_root_is_empty() {
    assert_eq!(RepoPath::root().as_str(), "");
}

#[test]
fn test_pull_request_number_display() {
    assert_eq!(PullRequestNumber::new(42).to_string(), "#42");
}
