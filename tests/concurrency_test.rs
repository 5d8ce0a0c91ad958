// Concurrent resolution against one shared template

use std::sync::Arc;
use std::thread;

mod common;

use common::{args, user_template};

#[test]
fn test_concurrent_resolve_on_threads() {
    let template = user_template();

    let requests: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let template = &template;
                scope.spawn(move || {
                    (0..50)
                        .map(|j| {
                            let id = format!("{}-{}", i, j);
                            let trace = format!("trace/{}", i);
                            let request = template
                                .resolve(&args(&[("id", id.as_str()), ("traceId", trace.as_str())]))
                                .unwrap();
                            (id, trace, request)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    assert_eq!(requests.len(), 16 * 50);
    for (id, trace, request) in &requests {
        assert_eq!(request.url(), format!("/users/{}", id));
        assert_eq!(request.header("X-Trace").unwrap(), [trace.as_str()]);
        assert!(Arc::ptr_eq(request.template().unwrap(), &template));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolve_on_tasks() {
    let template = user_template();

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let template = Arc::clone(&template);
            tokio::spawn(async move {
                let id = i.to_string();
                let request = template
                    .resolve(&args(&[("id", id.as_str()), ("traceId", "t")]))
                    .unwrap();
                (i, request)
            })
        })
        .collect();

    for handle in handles {
        let (i, request) = handle.await.unwrap();
        assert_eq!(request.url(), format!("/users/{}", i));
    }
}
