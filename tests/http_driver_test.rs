use httpmock::prelude::*;
use pagewatch::drivers::HttpDriver;
use pagewatch::{Driver, WatchUrl};
use std::time::Duration;

#[tokio::test]
async fn test_http_driver_fetches_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/item")
            .header("referer", "https://google.com")
            .header_exists("user-agent");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html><body>in stock</body></html>");
    });

    let driver = HttpDriver::new(Duration::from_secs(15)).unwrap();
    let url = WatchUrl::new(server.url("/item"), "item");

    let response = driver.get(&url).await.unwrap();

    mock.assert();
    assert_eq!(response.status_code, Some(200));
    assert!(response.ok());
    assert!(response.text.contains("in stock"));
    assert!(response.final_url.contains("/item"));
}

#[tokio::test]
async fn test_http_driver_passes_error_pages_through() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404).body("<html>not here</html>");
    });

    let driver = HttpDriver::new(Duration::from_secs(15)).unwrap();
    let url = WatchUrl::new(server.url("/gone"), "gone");

    // a 404 page is still a snapshot, not a driver failure
    let response = driver.get(&url).await.unwrap();
    assert_eq!(response.status_code, Some(404));
    assert!(!response.ok());
    assert!(response.text.contains("not here"));
}

#[tokio::test]
async fn test_http_driver_errors_on_unreachable_host() {
    // bind and drop a listener so the port is very likely closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let driver = HttpDriver::new(Duration::from_secs(2)).unwrap();
    let url = WatchUrl::new(format!("http://127.0.0.1:{}/", port), "dead");

    assert!(driver.get(&url).await.is_err());
}
