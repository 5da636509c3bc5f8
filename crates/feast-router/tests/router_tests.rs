//! Integration tests for web request matching and reverse routing
//!
//! Covers named routes, convention routing, verb-specific handlers, modules
//! and the match/build round trip.

use feast_router::{
    ActionDescriptor, ArgValue, Arguments, ControllerDescriptor, HandlerCatalog, HandlerVerb,
    HttpMethod, ModuleDescriptor, PathRequest, RouteAttribute, RouteRegistration, Router,
    RouterConfig, RouterError,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// Fixtures
// ============================================================================

fn catalog() -> HandlerCatalog {
    HandlerCatalog::new()
        .with_controller(
            ControllerDescriptor::new("index")
                .with_action(ActionDescriptor::new("index").with_handler(HandlerVerb::Action))
                .with_action(
                    ActionDescriptor::new("teapot")
                        .with_handler(HandlerVerb::Action)
                        .with_route(
                            RouteAttribute::new("im-a-teapot/:name/?:otherArgs").with_name("teapot"),
                        ),
                ),
        )
        .with_controller(
            ControllerDescriptor::new("testing").with_action(
                ActionDescriptor::new("service").with_handlers([HandlerVerb::Action, HandlerVerb::Post]),
            ),
        )
        .with_controller(
            ControllerDescriptor::new("blog")
                .with_action(
                    ActionDescriptor::new("show")
                        .with_handler(HandlerVerb::Get)
                        .with_route(RouteAttribute::new("blog/:slug").with_name("post")),
                )
                .with_action(
                    ActionDescriptor::new("archive")
                        .with_handler(HandlerVerb::Action)
                        .with_route(
                            RouteAttribute::new("archive/:year/?:month")
                                .with_name("archive")
                                .with_default("year", "2024"),
                        ),
                )
                .with_action(
                    ActionDescriptor::new("update")
                        .with_handler(HandlerVerb::Action)
                        .with_route(
                            RouteAttribute::new("blog/:slug")
                                .with_name("post")
                                .with_methods([HttpMethod::Put, HttpMethod::Patch]),
                        ),
                ),
        )
        .with_module(
            ModuleDescriptor::new("Admin").with_controller(
                ControllerDescriptor::new("users")
                    .with_action(ActionDescriptor::new("list").with_handler(HandlerVerb::Action))
                    .with_action(
                        ActionDescriptor::new("show")
                            .with_handler(HandlerVerb::Action)
                            .with_route(RouteAttribute::new("people/:id").with_name("admin-user")),
                    ),
            ),
        )
}

fn router() -> Router {
    let mut router = Router::new(catalog(), RouterConfig::default());
    router.discover().unwrap();
    router
}

// ============================================================================
// Convention routing
// ============================================================================

#[rstest]
#[case("", "index", "index")]
#[case("/", "index", "index")]
#[case("/shop", "shop", "index")]
#[case("/shop/", "shop", "index")]
#[case("/shop/list", "shop", "list")]
#[case("shop/list/page/2", "shop", "list")]
fn test_convention_targets(#[case] path: &str, #[case] controller: &str, #[case] action: &str) {
    let state = router().match_request(path, HttpMethod::Get);
    assert_eq!(state.module, "Default");
    assert_eq!(state.controller_name, controller);
    assert_eq!(state.action_name, action);
    assert_eq!(state.route_name, "");
}

#[test]
fn test_empty_path_dispatches_index_action() {
    let state = router().match_request("", HttpMethod::Get);
    assert_eq!(state.controller_class_name().unwrap(), "IndexController");
    assert_eq!(state.action_method_name().unwrap(), "indexAction");
}

#[test]
fn test_missing_target_is_not_found_when_dispatched() {
    let state = router().match_request("/nothing/here", HttpMethod::Get);
    let err = state.action_method_name().unwrap_err();
    assert!(matches!(err, RouterError::NotFound404 { .. }));
    assert_eq!(err.status_code(), 404);
}

// ============================================================================
// Named routes
// ============================================================================

#[test]
fn test_teapot_optional_tail() {
    let state = router().match_request("/im-a-teapot/test2", HttpMethod::Get);
    assert_eq!(state.route_name, "teapot");
    assert_eq!(state.controller_name, "index");
    assert_eq!(state.action_name, "teapot");
    assert_eq!(state.argument("name"), Some("test2"));
    assert_eq!(state.arguments.get("otherArgs"), Some(&ArgValue::Many(vec![])));
}

#[test]
fn test_teapot_variadic_tail() {
    let state = router().match_request("/im-a-teapot/test2/a/b/c", HttpMethod::Get);
    assert_eq!(
        state.arguments.get("otherArgs"),
        Some(&ArgValue::Many(vec!["a".into(), "b".into(), "c".into()]))
    );
}

#[test]
fn test_teapot_single_tail_value() {
    let state = router().match_request("/im-a-teapot/test2/a", HttpMethod::Get);
    assert_eq!(state.argument("otherArgs"), Some("a"));
}

#[test]
fn test_named_route_defaults() {
    let state = router().match_request("/archive", HttpMethod::Get);
    assert_eq!(state.route_name, "", "required segment missing from path");

    let state = router().match_request("/archive/2023", HttpMethod::Get);
    assert_eq!(state.route_name, "archive");
    assert_eq!(state.argument("year"), Some("2023"));
    assert_eq!(state.arguments.get("month"), Some(&ArgValue::Many(vec![])));
}

#[test]
fn test_named_route_values_bound_verbatim() {
    let router = router();
    let state = router.match_request("/blog/hello%20world", HttpMethod::Get);
    assert_eq!(state.route_name, "post");
    assert_eq!(state.argument("slug"), Some("hello%20world"));

    let state = router.match_request("/im-a-teapot/a%2Fb", HttpMethod::Get);
    assert_eq!(state.route_name, "teapot");
    assert_eq!(state.argument("name"), Some("a%2Fb"));
    assert_eq!(state.arguments.get("otherArgs"), Some(&ArgValue::Many(vec![])));
}

#[test]
fn test_same_template_distinct_methods() {
    let router = router();
    assert_eq!(router.match_request("/blog/x", HttpMethod::Get).action_name, "show");
    assert_eq!(router.match_request("/blog/x", HttpMethod::Put).action_name, "update");
    assert_eq!(router.match_request("/blog/x", HttpMethod::Patch).action_name, "update");

    let state = router.match_request("/blog/x", HttpMethod::Delete);
    assert_eq!(state.route_name, "");
    assert_eq!(state.action_name, "x");
}

#[test]
fn test_unnamed_route_is_named_after_its_path() {
    let mut router = router();
    router
        .register(RouteRegistration::new("feed/:format", "blog", "feed"))
        .unwrap();

    let state = router.match_request("/feed/rss", HttpMethod::Get);
    assert_eq!(state.route_name, "feed/(.*)");
    assert_eq!(state.argument("format"), Some("rss"));
}

#[test]
fn test_conflicting_route_rejected() {
    let mut router = router();
    let result = router.register(RouteRegistration::new("blog/:other", "blog", "other"));
    assert!(matches!(result, Err(RouterError::RouteConflict { method: HttpMethod::Get, .. })));

    router
        .register(
            RouteRegistration::new("blog/:other", "blog", "other")
                .with_name("delete-post")
                .with_method(HttpMethod::Delete),
        )
        .unwrap();
}

// ============================================================================
// Handler methods
// ============================================================================

#[rstest]
#[case(HttpMethod::Get, "serviceAction")]
#[case(HttpMethod::Post, "servicePost")]
#[case(HttpMethod::Put, "serviceAction")]
#[case(HttpMethod::Delete, "serviceAction")]
fn test_verb_specific_handlers(#[case] method: HttpMethod, #[case] expected: &str) {
    let state = router().match_request("/testing/service/a/b", method);
    assert_eq!(state.action_method_name().unwrap(), expected);
    assert_eq!(state.argument("a"), Some("b"));
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_module_convention_routing() {
    let state = router().match_request("/Admin/users/list", HttpMethod::Get);
    assert_eq!(state.module, "Admin");
    assert_eq!(state.action_method_name().unwrap(), "listAction");
}

#[test]
fn test_module_named_route_matches_its_template() {
    let router = router();
    let state = router.match_request("/people/7", HttpMethod::Get);
    assert_eq!(state.route_name, "admin-user");
    assert_eq!(state.module, "Admin");
    assert_eq!(state.argument("id"), Some("7"));
    assert_eq!(state.action_method_name().unwrap(), "showAction");

    let path = router
        .get_path(None, &PathRequest::route("admin-user").with_argument("id", "7"))
        .unwrap();
    assert_eq!(path, "/people/7");

    let state = router.match_request("/admin/people/7", HttpMethod::Get);
    assert_eq!(state.route_name, "admin-user");
    assert_eq!(state.module, "Admin");
}

// ============================================================================
// Reverse routing
// ============================================================================

#[test]
fn test_get_path_unknown_route() {
    let err = router().get_path(None, &PathRequest::route("nope")).unwrap_err();
    assert!(matches!(err, RouterError::NotFoundRoute(ref name) if name == "nope"));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_get_path_strips_index_segments() {
    let router = router();
    let path = router
        .get_path(None, &PathRequest::action("index").with_controller("testing"))
        .unwrap();
    assert_eq!(path, "/testing");
}

#[rstest]
#[case("/im-a-teapot/test2", HttpMethod::Get)]
#[case("/im-a-teapot/test2/a", HttpMethod::Get)]
#[case("/im-a-teapot/earl-grey/a/b", HttpMethod::Get)]
#[case("/blog/cafe", HttpMethod::Get)]
#[case("/blog/draft", HttpMethod::Put)]
#[case("/archive/2023/05", HttpMethod::Get)]
#[case("/people/7", HttpMethod::Get)]
#[case("/admin/people/7", HttpMethod::Get)]
fn test_named_round_trip(#[case] path: &str, #[case] method: HttpMethod) {
    let router = router();
    let matched = router.match_request(path, method);
    assert!(!matched.route_name.is_empty(), "{} should hit a named route", path);

    let built = router
        .get_path(
            Some(&matched),
            &PathRequest::route(matched.route_name.clone())
                .with_method(method)
                .with_arguments(matched.arguments.clone()),
        )
        .unwrap();
    let rematched = router.match_request(&built, method);

    assert_eq!(rematched.route_name, matched.route_name);
    assert_eq!(rematched.arguments, matched.arguments);
}

#[test]
fn test_conventional_round_trip() {
    let router = router();
    let arguments = Arguments::new().with("id", "5").with("title", "spring-menu");

    let path = router
        .get_path(
            None,
            &PathRequest::action("edit")
                .with_controller("pages")
                .with_arguments(arguments.clone())
                .with_query("draft", "1"),
        )
        .unwrap();
    assert_eq!(path, "/pages/edit/id/5/title/spring-menu?draft=1");

    let state = router.match_request(&path, HttpMethod::Get);
    assert_eq!(state.controller_name, "pages");
    assert_eq!(state.action_name, "edit");
    assert_eq!(state.arguments, arguments);
    assert_eq!(state.query.get_str("draft"), Some("1"));
}

#[test]
fn test_encoded_values_come_back_encoded() {
    let router = router();
    let request = PathRequest::action("edit")
        .with_controller("pages")
        .with_argument("title", "a b/c");
    let path = router.get_path(None, &request).unwrap();
    assert_eq!(path, "/pages/edit/title/a%20b%2Fc");

    let state = router.match_request(&path, HttpMethod::Get);
    assert_eq!(state.argument("title"), Some("a%20b%2Fc"));
}

#[test]
fn test_links_relative_to_current_request() {
    let router = router();
    let current = router.match_request("/admin/users/list", HttpMethod::Get);
    let path = router.get_path(Some(&current), &PathRequest::action("index")).unwrap();
    assert_eq!(path, "/Admin/users");
}
