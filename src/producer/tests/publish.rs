//! Steady-state publishing against a reachable broker

use super::support::{producer, BrokerBehaviour, ScriptedResolver, ScriptedTransport};
use crate::producer::api::{PublishOutcome, PublishPolicy, MESSAGE_CONTENT_TYPE};

#[tokio::test]
async fn test_single_broker_publish_makes_one_call() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(200))]);
    let producer = producer(&["a:8161"], PublishPolicy::default(), &resolver, &transport);
    producer.initialize().await.unwrap();
    let before = producer.active_url();

    let outcome = producer.publish(br#"{"x":1}"#, "test").await;

    assert_eq!(outcome, PublishOutcome::Status(200));
    assert_eq!(outcome.legacy_status(), 200);
    let posts = transport.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].url,
        "http://admin:admin@a:8161/api/message?destination=queue://test&jms.closeTimeout=5000"
    );
    assert_eq!(posts[0].content_type, MESSAGE_CONTENT_TYPE);
    assert_eq!(posts[0].body, br#"{"x":1}"#.to_vec());
    assert_eq!(producer.active_url(), before);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_sequential_publishes_are_independent() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(200))]);
    let producer = producer(&["a:8161", "b:8161"], PublishPolicy::default(), &resolver, &transport);
    producer.initialize().await.unwrap();
    let before = producer.active_url();

    let first = producer.publish(b"same", "jobs").await;
    let second = producer.publish(b"same", "jobs").await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(transport.posts().len(), 2);
    assert_eq!(producer.active_url(), before);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_non_200_is_returned_without_resolution() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(404))]);
    let producer = producer(
        &["a:8161", "b:8161"],
        PublishPolicy::single_attempt(),
        &resolver,
        &transport,
    );
    producer.initialize().await.unwrap();

    let outcome = producer.publish(b"{}", "missing").await;

    assert_eq!(outcome, PublishOutcome::Status(404));
    assert_eq!(transport.posts().len(), 1);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_non_200_is_retried_on_same_broker_within_budget() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(503))]);
    let producer = producer(&["a:8161", "b:8161"], PublishPolicy::new(3), &resolver, &transport);
    producer.initialize().await.unwrap();

    let outcome = producer.publish(b"{}", "busy").await;

    assert_eq!(outcome.legacy_status(), 503);
    assert_eq!(transport.hosts(), vec!["a:8161"; 3]);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_empty_queue_is_rejected_before_io() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(200))]);
    let producer = producer(&["a:8161"], PublishPolicy::default(), &resolver, &transport);
    producer.initialize().await.unwrap();

    for queue in ["", "two words", "a&b"] {
        let outcome = producer.publish(b"{}", queue).await;
        assert!(matches!(outcome, PublishOutcome::InvalidQueue(_)), "{:?}", queue);
        assert_eq!(outcome.legacy_status(), 400);
    }
    assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn test_empty_body_is_sent_verbatim() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(200))]);
    let producer = producer(&["a:8161"], PublishPolicy::default(), &resolver, &transport);
    producer.initialize().await.unwrap();

    let outcome = producer.publish(b"", "test").await;

    assert!(outcome.is_success());
    let posts = transport.posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].body.is_empty());
}

#[tokio::test]
async fn test_single_broker_transport_failure_never_resolves() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Refuse)]);
    let producer = producer(&["a:8161"], PublishPolicy::new(2), &resolver, &transport);
    producer.initialize().await.unwrap();

    let outcome = producer.publish(b"{}", "test").await;

    assert!(matches!(outcome, PublishOutcome::Transport(_)));
    assert_eq!(producer.publish_status(b"{}", "test").await, 500);
    assert_eq!(transport.hosts(), vec!["a:8161"; 4]);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_reserved_characters_in_queue_reach_broker_unchanged() {
    let resolver = ScriptedResolver::with_master("a:8161");
    let transport = ScriptedTransport::new(&[("a:8161", BrokerBehaviour::Answer(200))]);
    let producer = producer(&["a:8161"], PublishPolicy::default(), &resolver, &transport);
    producer.initialize().await.unwrap();

    let queues = ["orders+eu", "x%41y", "a%zz"];
    for queue in queues {
        assert!(producer.publish(b"{}", queue).await.is_success());
    }

    let destinations: Vec<String> = transport
        .posts()
        .iter()
        .map(|post| {
            reqwest::Url::parse(&post.url)
                .unwrap()
                .query_pairs()
                .find(|(key, _)| key == "destination")
                .map(|(_, value)| value.into_owned())
                .unwrap()
        })
        .collect();
    assert_eq!(
        destinations,
        vec!["queue://orders+eu", "queue://x%41y", "queue://a%zz"]
    );
}
