use codeling::{coding_toolkit, system_prompt, Agent, Role, StubModel, ToolsConfig};
use tempfile::tempdir;

fn agent_with_tools(responses: Vec<String>) -> Agent<StubModel> {
    let tools = coding_toolkit(&ToolsConfig::default(), None);
    let cwd = std::env::current_dir().unwrap();
    let prompt = system_prompt(&cwd, &tools);
    Agent::new(StubModel::new(responses), tools, prompt)
}

#[tokio::test]
async fn glob_request_chains_tool_result_into_the_final_answer() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("app.py"), "print('hi')\n").unwrap();
    std::fs::write(dir.path().join("util.py"), "").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "").unwrap();

    let call = format!(
        r#"Let me check. {{"tool": "glob", "args": {{"pat": "*.py", "path": "{}"}}}}"#,
        dir.path().display()
    );
    let mut agent = agent_with_tools(vec![
        call,
        "There are two Python files: app.py and util.py.".into(),
    ]);

    agent.run_turn("which python files are here?").await.unwrap();

    let messages = agent.conversation().messages();
    assert_eq!(messages.len(), 5);

    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].content, "which python files are here?");
    assert!(messages[2].content.contains(r#""tool": "glob""#));

    assert_eq!(messages[3].role, Role::User);
    assert!(messages[3].content.starts_with("Tool result:\n"));
    assert!(messages[3].content.contains("app.py"));
    assert!(messages[3].content.contains("util.py"));
    assert!(!messages[3].content.contains("notes.txt"));

    assert_eq!(
        messages[4].content,
        "There are two Python files: app.py and util.py."
    );
}

#[tokio::test]
async fn ambiguous_edit_is_refused_then_retried_with_all() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.ini");
    std::fs::write(&path, "debug=false\ntrace=false\n").unwrap();

    let first = format!(
        r#"{{"tool": "edit", "args": {{"path": "{}", "old": "false", "new": "true"}}}}"#,
        path.display()
    );
    let second = format!(
        r#"Retrying for every occurrence. {{"tool": "edit", "args": {{"path": "{}", "old": "false", "new": "true", "all": true}}}}"#,
        path.display()
    );
    let mut agent = agent_with_tools(vec![first, second, "Both flags are enabled now.".into()]);

    agent.run_turn("enable both flags").await.unwrap();

    let messages = agent.conversation().messages();
    assert_eq!(messages.len(), 7);
    assert_eq!(
        messages[3].content,
        "Tool result:\nerror: old_string appears 2 times, must be unique (use all=true)"
    );
    assert_eq!(messages[5].content, "Tool result:\nok");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "debug=true\ntrace=true\n"
    );
}

#[tokio::test]
async fn turns_accumulate_until_reset() {
    let mut agent = agent_with_tools(vec![
        "Hello!".into(),
        "Goodbye!".into(),
    ]);

    agent.run_turn("hi").await.unwrap();
    agent.run_turn("bye").await.unwrap();
    assert_eq!(agent.conversation().len(), 5);

    agent.reset();
    assert_eq!(agent.conversation().len(), 1);
    assert_eq!(agent.conversation().messages()[0].role, Role::System);
}

#[tokio::test]
async fn read_after_write_round_trips_through_the_loop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("greeting.txt");

    let write = format!(
        r#"{{"tool": "write", "args": {{"path": "{}", "content": "hello"}}}}"#,
        path.display()
    );
    let read = format!(
        r#"{{"tool": "read", "args": {{"path": "{}"}}}}"#,
        path.display()
    );
    let mut agent = agent_with_tools(vec![write, read, "The file says hello.".into()]);

    agent.run_turn("write then read back greeting.txt").await.unwrap();

    let messages = agent.conversation().messages();
    assert_eq!(messages[3].content, "Tool result:\nok");
    assert_eq!(messages[5].content, "Tool result:\n   1| hello");
}
