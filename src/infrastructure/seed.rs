//! Seed data: the built-in code block catalog.
//!
//! Stands in for the administrative process that provisions exercises in a
//! production deployment.

use crate::domain::{CodeBlock, CodeBlockId, CodeContent};

/// The code blocks the server ships with.
pub fn default_code_blocks() -> Vec<CodeBlock> {
    vec![
        code_block(
            "async-case",
            "Async case",
            r#"async function fetchUser(id) {
  // TODO: fetch /api/users/:id and return the parsed JSON
  const response = fetch('/api/users/' + id);
  return response.json();
}
"#,
            r#"async function fetchUser(id) {
  const response = await fetch('/api/users/' + id);
  return await response.json();
}
"#,
        ),
        code_block(
            "promise-chain",
            "Promise chain",
            r#"function loadProfile(userId) {
  // TODO: chain the calls so the avatar loads after the user
  getUser(userId);
  getAvatar(userId);
}
"#,
            r#"function loadProfile(userId) {
  return getUser(userId)
    .then((user) => getAvatar(user.avatarId))
    .then((avatar) => ({ user: userId, avatar }));
}
"#,
        ),
        code_block(
            "callback-hell",
            "Callback hell",
            r#"readFile('a.txt', function (a) {
  readFile('b.txt', function (b) {
    readFile('c.txt', function (c) {
      console.log(a + b + c);
    });
  });
});
"#,
            r#"const [a, b, c] = await Promise.all([
  readFile('a.txt'),
  readFile('b.txt'),
  readFile('c.txt'),
]);
console.log(a + b + c);
"#,
        ),
        code_block(
            "closure-counter",
            "Closure counter",
            r#"function makeCounter() {
  // TODO: return a function that increments and returns count
  let count = 0;
}
"#,
            r#"function makeCounter() {
  let count = 0;
  return function () {
    count += 1;
    return count;
  };
}
"#,
        ),
    ]
}

fn code_block(id: &str, name: &str, initial: &str, solution: &str) -> CodeBlock {
    CodeBlock::new(
        CodeBlockId::new(id.to_string()).expect("seed code block id is valid"),
        name.to_string(),
        CodeContent::new(initial.to_string()).expect("seed initial code is valid"),
        CodeContent::new(solution.to_string()).expect("seed solution is valid"),
    )
}
