use std::sync::Arc;
use tessera_core::Cell;
use tessera_server::{ClientError, GridClient, GridServer, ServerConfig};
use tokio::net::TcpListener;

async fn start_server(max_sessions: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Arc::new(GridServer::new(ServerConfig { addr, max_sessions }));

    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    format!("ws://{}", addr)
}

fn positions(path: &[Cell]) -> Vec<(usize, usize)> {
    path.iter().map(Cell::position).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_session() {
    let url = start_server(4).await;
    let mut client = GridClient::connect(&url).await.unwrap();

    let rows = vec![
        vec![1, 1, 0, 0],
        vec![0, 1, 1, 0],
        vec![0, 0, 1, 1],
        vec![0, 0, 0, 1],
    ];
    let grid = client.load_grid(rows.clone()).await.unwrap();
    assert_eq!(grid.rows(), rows.as_slice());

    let components = client.components().await.unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].len(), 7);

    // One staircase component, not a rectangle.
    assert_eq!(client.pattern_count().await.unwrap(), 0);

    let path = client
        .shortest_path(Cell::new(0, 0), Cell::new(3, 3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        positions(&path),
        vec![(0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 3), (3, 3)]
    );

    let weighted = client
        .weighted_path(Cell::new(0, 0), Cell::new(3, 3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(weighted.first(), Some(&Cell::new(0, 0)));
    assert_eq!(weighted.last(), Some(&Cell::new(3, 3)));

    client.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queries_before_upload() {
    let url = start_server(4).await;
    let mut client = GridClient::connect(&url).await.unwrap();

    assert_eq!(client.pattern_count().await.unwrap(), -1);
    assert!(client.components().await.unwrap().is_empty());

    client.load_grid(vec![vec![1, 1], vec![1, 1]]).await.unwrap();
    assert_eq!(client.pattern_count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_target() {
    let url = start_server(4).await;
    let mut client = GridClient::connect(&url).await.unwrap();

    client.load_grid(vec![vec![1, 0, 1]]).await.unwrap();
    let path = client
        .shortest_path(Cell::new(0, 0), Cell::new(0, 2))
        .await
        .unwrap();
    assert_eq!(path, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_request_closes_session() {
    let url = start_server(4).await;
    let mut client = GridClient::connect(&url).await.unwrap();

    client.load_grid(vec![vec![1, 1]]).await.unwrap();
    let result = client.shortest_path(Cell::new(0, 0), Cell::new(0, 0)).await;
    assert!(matches!(
        result,
        Err(ClientError::Closed) | Err(ClientError::Transport(_))
    ));

    // A fresh connection starts from scratch.
    let mut client = GridClient::connect(&url).await.unwrap();
    assert_eq!(client.pattern_count().await.unwrap(), -1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sessions_are_isolated() {
    let url = start_server(4).await;
    let mut first = GridClient::connect(&url).await.unwrap();
    let mut second = GridClient::connect(&url).await.unwrap();

    first.load_grid(vec![vec![1, 1]]).await.unwrap();
    assert_eq!(first.pattern_count().await.unwrap(), 1);
    assert_eq!(second.pattern_count().await.unwrap(), -1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_waiting_client_served_after_slot_frees() {
    let url = start_server(1).await;
    let mut first = GridClient::connect(&url).await.unwrap();
    assert_eq!(first.pattern_count().await.unwrap(), -1);

    let waiting = {
        let url = url.clone();
        tokio::spawn(async move {
            let mut client = GridClient::connect(&url).await.unwrap();
            client.pattern_count().await.unwrap()
        })
    };

    first.stop().await.unwrap();
    assert_eq!(waiting.await.unwrap(), -1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_stops_accepting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("ws://{}", addr);
    let server = GridServer::new(ServerConfig {
        addr,
        max_sessions: 2,
    });
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let serving = tokio::spawn(async move {
        server
            .serve_until(listener, async {
                let _ = stop_rx.await;
            })
            .await
            .map_err(|e| e.to_string())
    });

    let mut client = GridClient::connect(&url).await.unwrap();
    assert_eq!(client.pattern_count().await.unwrap(), -1);

    stop_tx.send(()).unwrap();
    assert_eq!(serving.await.unwrap(), Ok(()));

    // The session that was already running keeps working.
    client.load_grid(vec![vec![1, 1]]).await.unwrap();
    assert_eq!(client.pattern_count().await.unwrap(), 1);

    assert!(GridClient::connect(&url).await.is_err());
}
