use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, HTTPGetAction, PodSpec, PodTemplateSpec, Probe};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde_json::{Value, json};

pub(crate) fn load_request_data(request_file_name: &str) -> Vec<u8> {
    let request_file_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(request_file_name);
    std::fs::read(request_file_path).expect("cannot read request file")
}

pub(crate) fn http_probe(path: &str) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path.to_owned()),
            port: IntOrString::Int(8080),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub(crate) fn container(name: &str) -> Container {
    Container {
        name: name.to_owned(),
        image: Some("nginx:1.27".to_owned()),
        ..Default::default()
    }
}

pub(crate) fn deployment(containers: Vec<Container>) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some("nginx".to_owned()),
            namespace: Some("default".to_owned()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(2),
            template: PodTemplateSpec {
                spec: Some(PodSpec {
                    containers,
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Wrap settings and object into the payload of a `validate` call
pub(crate) fn validation_request(settings: Value, object: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "settings": settings,
        "request": {
            "uid": "b6a4b8a1-5e0a-4c43-9d8a-2c4a2f8b3a10",
            "kind": {"group": "apps", "version": "v1", "kind": "Deployment"},
            "resource": {"group": "apps", "version": "v1", "resource": "deployments"},
            "subResource": "",
            "requestKind": {"group": "apps", "version": "v1", "kind": "Deployment"},
            "requestResource": {"group": "apps", "version": "v1", "resource": "deployments"},
            "name": "nginx",
            "namespace": "default",
            "operation": "CREATE",
            "userInfo": {
                "username": "kubernetes-admin",
                "groups": ["system:masters", "system:authenticated"]
            },
            "object": object,
            "options": {"apiVersion": "meta.k8s.io/v1", "kind": "CreateOptions"},
            "dryRun": false
        }
    }))
    .expect("cannot serialize validation request")
}
