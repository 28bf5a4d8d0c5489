//! Full lifecycle test against a live server.
//!
//! # Design
//! Starts the server on a random port, then drives every endpoint through
//! `TodoClient` over real HTTP using ureq, so request building, routing and
//! response parsing are checked together.

use todo_core::{
    ApiError, Channel, HttpMethod, HttpResponse, LogLevel, NewTodo, SortBy, StatusFilter, TodoClient,
    TodoStatus,
};
use todo_server::AppState;

const FUTURE: i64 = 4_102_444_800_000;

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data rather than `Err`, so the client does
/// the interpreting.
fn execute(req: todo_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn new_todo(title: &str, due_date: i64) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        content: String::new(),
        due_date,
    }
}

#[test]
fn todo_lifecycle() {
    // Step 1: start the server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, AppState::default()).await
        })
        .unwrap();
    });

    let client = TodoClient::new(&format!("http://{addr}"));

    // Step 2: health.
    let health = client.parse_health(execute(client.build_health())).unwrap();
    assert_eq!(health, "OK");

    // Step 3: create three todos.
    for (title, due) in [("Walk dog", FUTURE + 30), ("Buy milk", FUTURE + 10), ("Call mom", FUTURE + 20)] {
        let req = client.build_create_todo(&new_todo(title, due)).unwrap();
        client.parse_create_todo(execute(req)).unwrap();
    }

    // Step 4: duplicate title is a conflict.
    let req = client.build_create_todo(&new_todo("Buy milk", FUTURE)).unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // Step 5: the failure alerted the todo channel; this request clears it.
    let req = client.build_logger_level(Channel::Todo).unwrap();
    assert_eq!(client.parse_logger_level(execute(req)).unwrap(), LogLevel::Debug);

    // Step 6: list by due date.
    let req = client.build_list(StatusFilter::All, SortBy::DueDate).unwrap();
    let titles: Vec<String> = client
        .parse_list(execute(req))
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Buy milk", "Call mom", "Walk dog"]);

    // Step 7: mark one done.
    let req = client.build_update_status(2, TodoStatus::Done).unwrap();
    assert_eq!(client.parse_update_status(execute(req)).unwrap(), TodoStatus::Pending);

    let req = client.build_count(StatusFilter::Only(TodoStatus::Done)).unwrap();
    assert_eq!(client.parse_count(execute(req)).unwrap(), 1);

    // Step 8: delete, then delete again.
    let req = client.build_delete_todo(1).unwrap();
    assert_eq!(client.parse_delete_todo(execute(req)).unwrap(), 2);

    let req = client.build_delete_todo(1).unwrap();
    let err = client.parse_delete_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Step 9: ids keep counting after a delete.
    let req = client.build_create_todo(&new_todo("Water plants", FUTURE)).unwrap();
    assert_eq!(client.parse_create_todo(execute(req)).unwrap(), 4);

    // Step 10: adjust and read back a channel level.
    let req = client.build_set_logger_level(Channel::Request, LogLevel::Debug).unwrap();
    assert_eq!(client.parse_set_logger_level(execute(req)).unwrap(), LogLevel::Debug);

    let req = client.build_logger_level(Channel::Request).unwrap();
    assert_eq!(client.parse_logger_level(execute(req)).unwrap(), LogLevel::Debug);

    // Step 11: final count.
    let req = client.build_count(StatusFilter::All).unwrap();
    assert_eq!(client.parse_count(execute(req)).unwrap(), 3);
}
