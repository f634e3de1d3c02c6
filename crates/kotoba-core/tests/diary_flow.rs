//! End-to-end: a student writes, the teacher reads a translated memo and
//! answers with advice that comes back in the student's language.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kotoba_core::identity::PasswordIdentity;
use kotoba_core::profile::ensure_profile;
use kotoba_core::{Context, Dispatcher, Outcome};
use kotoba_db::Database;
use kotoba_translate::{TranslateError, Translator};
use kotoba_types::api::View;
use kotoba_types::events::{AppEvent, DiaryEvent};
use kotoba_types::models::{DiaryEntry, Role};

#[derive(Default)]
struct StubTranslator {
    calls: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source_lang.to_string(), target_lang.to_string()));
        Ok(format!("({}) {}", target_lang, text))
    }
}

struct World {
    db: Arc<Database>,
    translator: Arc<StubTranslator>,
    ctx: Context,
}

fn world() -> World {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let translator = Arc::new(StubTranslator::default());
    let identity = Arc::new(PasswordIdentity::new(
        db.clone(),
        "integration-secret",
        chrono::Duration::hours(1),
    ));
    let ctx = Context::new(db.clone(), translator.clone(), identity);
    World { db, translator, ctx }
}

async fn sign_up(world: &World, email: &str, name: &str, role: Role) -> String {
    let session = world.ctx.identity.sign_in(email, "correct horse").unwrap();
    let user = ensure_profile(&world.ctx, &session.identity, name, Some(role))
        .await
        .unwrap();
    user.id
}

#[tokio::test]
async fn student_entry_round_trips_through_teacher_advice() {
    let world = world();
    let student = sign_up(&world, "aiko@example.com", "Aiko", Role::Student).await;
    let teacher = sign_up(&world, "tanaka@example.com", "Tanaka", Role::Teacher).await;
    world.db.assign_pair(&student, &teacher).unwrap();

    let dispatcher = Dispatcher::new(world.ctx.clone());
    let mut events = dispatcher.subscribe();

    // Student writes
    dispatcher
        .dispatch(AppEvent::DiarySubmitted {
            user_id: student.clone(),
            entry: DiaryEntry {
                date: "2024-01-01".into(),
                language: "en".into(),
                memo: "Hello".into(),
                ..Default::default()
            },
        })
        .await
        .unwrap();
    assert!(matches!(events.recv().await.unwrap(), DiaryEvent::MessageCreated { .. }));

    // Teacher reads
    let Outcome::View(View::Teacher(view)) = dispatcher
        .dispatch(AppEvent::SignedIn { user_id: teacher.clone() })
        .await
        .unwrap()
    else {
        panic!("expected a teacher view");
    };
    assert_eq!(view.name, "Tanaka");
    assert_eq!(view.sections.len(), 1);
    let section = &view.sections[0];
    assert_eq!(section.student_name, "Aiko");
    assert_eq!(section.thread_id.as_str(), format!("{}_{}", student, teacher));
    assert_eq!(section.entries.len(), 1);

    let entry = &section.entries[0];
    assert_eq!(entry.message.memo, "Hello");
    assert_eq!(entry.message.language, "en");
    assert_eq!(
        *world.translator.calls.lock().unwrap(),
        vec![("Hello".to_string(), "en".to_string(), "ja".to_string())]
    );

    // Teacher answers
    let Outcome::Advice(Some(updated)) = dispatcher
        .dispatch(AppEvent::AdviceSubmitted {
            user_id: teacher.clone(),
            thread_id: section.thread_id.clone(),
            message_id: entry.message.id.clone(),
            advice: "良い文です".into(),
        })
        .await
        .unwrap()
    else {
        panic!("expected stored advice");
    };
    assert_eq!(updated.advice_original.as_deref(), Some("良い文です"));
    assert_eq!(updated.advice.as_deref(), Some("(en) 良い文です"));
    assert!(matches!(events.recv().await.unwrap(), DiaryEvent::AdviceUpdated { .. }));

    // Student sees it
    let Outcome::View(View::Student(own)) = dispatcher
        .dispatch(AppEvent::SignedIn { user_id: student })
        .await
        .unwrap()
    else {
        panic!("expected a student view");
    };
    assert_eq!(own.name, "Aiko");
    assert_eq!(own.entries[0].advice.as_deref(), Some("(en) 良い文です"));
}

#[tokio::test]
async fn newest_entry_is_listed_first() {
    let world = world();
    let student = sign_up(&world, "ken@example.com", "Ken", Role::Student).await;
    let teacher = sign_up(&world, "sato@example.com", "Sato", Role::Teacher).await;
    world.db.assign_pair(&student, &teacher).unwrap();
    let dispatcher = Dispatcher::new(world.ctx.clone());

    let mut last = None;
    for day in 1..=3 {
        let outcome = dispatcher
            .dispatch(AppEvent::DiarySubmitted {
                user_id: student.clone(),
                entry: DiaryEntry {
                    date: format!("2024-01-0{}", day),
                    language: "ja".into(),
                    memo: format!("day {}", day),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        last = Some(outcome);
    }

    let Some(Outcome::View(View::Student(view))) = last else {
        panic!("expected a student view");
    };
    let dates: Vec<_> = view.entries.iter().map(|m| m.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);

    // Japanese memos are never sent for translation
    dispatcher
        .dispatch(AppEvent::SignedIn { user_id: teacher })
        .await
        .unwrap();
    assert!(world.translator.calls.lock().unwrap().is_empty());
}
