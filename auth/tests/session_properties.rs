//! Property tests: session invariants hold for any action sequence.

use gurubook_auth::{
    ApiError, ApiResponse, AuthAction, AuthEffect, AuthEnvironment, AuthPayload, AuthReducer,
    FormBody, LoginRequest, Operation, RegisterRequest, RequestId, ResetPasswordRequest, Session,
    SetNewPasswordRequest,
};
use gurubook_core::reducer::Reducer;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Request(usize),
    Outcome { slot: usize, success: bool },
    StrayOutcome { op: usize, success: bool },
    SignOut,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..Operation::ALL.len()).prop_map(Step::Request),
        3 => (any::<usize>(), any::<bool>()).prop_map(|(slot, success)| Step::Outcome { slot, success }),
        1 => (0..Operation::ALL.len(), any::<bool>())
            .prop_map(|(op, success)| Step::StrayOutcome { op, success }),
        1 => Just(Step::SignOut),
    ]
}

fn request(operation: Operation, request_id: RequestId) -> AuthAction {
    match operation {
        Operation::Login => AuthAction::Login {
            request_id,
            request: LoginRequest::new("e@x.com", "pw"),
        },
        Operation::Register => AuthAction::Register {
            request_id,
            request: RegisterRequest::new("A", "B", "e@x.com", "pw"),
        },
        Operation::ResetPassword => AuthAction::ResetPassword {
            request_id,
            request: ResetPasswordRequest::new("e@x.com"),
        },
        Operation::SetNewPassword => AuthAction::SetNewPassword {
            request_id,
            request: SetNewPasswordRequest::new("new-pw", "R"),
        },
    }
}

fn outcome(operation: Operation, request_id: RequestId, success: bool) -> AuthAction {
    if !success {
        return AuthAction::Rejected {
            request_id,
            operation,
            error: ApiError::Network("offline".to_string()),
        };
    }

    let response = if operation.establishes_session() {
        ApiResponse::Authenticated(AuthPayload {
            access_token: "T".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "e@x.com".to_string(),
        })
    } else {
        ApiResponse::Acknowledged(serde_json::Value::Null)
    };

    AuthAction::Fulfilled {
        request_id,
        operation,
        response,
    }
}

fn check_invariants(session: &Session) -> Result<(), TestCaseError> {
    prop_assert_eq!(session.loading, !session.pending.is_empty());
    prop_assert_eq!(session.is_logged_in, session.token.is_some());
    prop_assert_eq!(session.token.is_some(), session.profile.is_some());
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(steps in prop::collection::vec(step(), 0..40)) {
        let reducer = AuthReducer::new();
        let env = AuthEnvironment::default();
        let mut session = Session::new();
        let mut issued: Vec<(Operation, RequestId)> = Vec::new();

        for step in steps {
            match step {
                Step::Request(index) => {
                    let operation = Operation::ALL[index];
                    let request_id = RequestId::new();
                    let was_pending = session.is_pending(operation);

                    let effects = reducer.reduce(&mut session, request(operation, request_id), &env);

                    prop_assert_eq!(effects.len(), 1);
                    if was_pending {
                        prop_assert_eq!(
                            &effects[0],
                            &AuthEffect::Refuse { request_id, operation }
                        );
                        prop_assert_ne!(session.pending_request(operation), Some(request_id));
                    } else {
                        let is_call = matches!(
                            &effects[0],
                            AuthEffect::Call { operation: op, request_id: id, .. }
                                if *op == operation && *id == request_id
                        );
                        prop_assert!(is_call);
                        prop_assert_eq!(session.pending_request(operation), Some(request_id));
                        issued.push((operation, request_id));
                    }
                },
                Step::Outcome { slot, success } => {
                    if issued.is_empty() {
                        continue;
                    }
                    let (operation, request_id) = issued[slot % issued.len()];
                    let current = session.pending_request(operation) == Some(request_id);
                    let before = session.clone();

                    let effects = reducer.reduce(&mut session, outcome(operation, request_id, success), &env);

                    if current {
                        prop_assert!(!session.is_pending(operation));
                        if success && operation.establishes_session() {
                            prop_assert!(session.is_logged_in);
                        }
                        if !success {
                            prop_assert_eq!(effects.len(), 1);
                        }
                    } else {
                        prop_assert_eq!(&session, &before);
                        prop_assert!(effects.is_empty());
                    }
                },
                Step::StrayOutcome { op, success } => {
                    let before = session.clone();
                    let effects = reducer.reduce(
                        &mut session,
                        outcome(Operation::ALL[op], RequestId::new(), success),
                        &env,
                    );
                    prop_assert_eq!(&session, &before);
                    prop_assert!(effects.is_empty());
                },
                Step::SignOut => {
                    let effects = reducer.reduce(&mut session, AuthAction::SignOut, &env);
                    prop_assert_eq!(&session, &Session::default());
                    prop_assert_eq!(effects.as_slice(), &[AuthEffect::SetBearer(None)]);
                },
            }

            check_invariants(&session)?;
        }
    }

    #[test]
    fn form_body_debug_never_leaks_passwords(password in "[a-zA-Z0-9]{12,24}") {
        let body: FormBody = LoginRequest::new("e@x.com", password.clone()).form_body();
        let rendered = format!("{body:?}");
        prop_assert!(!rendered.contains(&password));
    }
}
