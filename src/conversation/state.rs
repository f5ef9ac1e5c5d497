use crate::conversation::keyboards;
use crate::error::{Field, Reason, ValidationError};
use crate::models::{Area, Detail, Draft, HouseType, Poster, PropertyUse, RentOrSell, Rooms};
use crate::normalize;
use crate::services::{Input, Keyboard};
use crate::texts::messages;

/// Position in the listing conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Idle,
    RentOrSell,
    PropertyUse,
    HouseType,
    Rooms,
    Area,
    Location,
    Price,
    Info,
    Contact,
    Photos,
    Confirm,
}

impl State {
    pub fn is_active(self) -> bool {
        self != State::Idle
    }
}

/// One conversation: where it is and what it has collected
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: State,
    pub draft: Draft,
}

/// A question (or re-question) for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Prompt {
    fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// The question asked on entering `state`.
pub fn prompt(state: State) -> Option<Prompt> {
    let prompt = match state {
        State::Idle => return None,
        State::RentOrSell => Prompt::new(messages::POST_START, keyboards::RENT_SELL),
        State::PropertyUse => Prompt::new(messages::ASK_PROPERTY_USE, keyboards::PROPERTY_USE),
        State::HouseType => Prompt::new(messages::ASK_HOUSE_TYPE, keyboards::HOUSE_TYPE),
        State::Rooms => Prompt::new(messages::ASK_ROOMS, keyboards::ROOMS),
        State::Area => Prompt::new(messages::ASK_AREA, keyboards::AREA),
        State::Location => Prompt::new(messages::ASK_LOCATION, Keyboard::Remove),
        State::Price => Prompt::new(messages::ASK_PRICE, Keyboard::Remove),
        State::Info => Prompt::new(messages::ASK_INFO, Keyboard::Remove),
        State::Contact => Prompt::new(
            format!("{}\n{}", messages::ASK_CONTACT, messages::CONTACT_FORMAT_EXAMPLE),
            keyboards::SHARE_CONTACT_REQUEST,
        ),
        State::Photos => Prompt::new(messages::ASK_PHOTOS, keyboards::PREVIEW_ONLY),
        State::Confirm => Prompt::new(messages::CONFIRM_PROMPT, keyboards::CONFIRM_CANCEL),
    };
    Some(prompt)
}

/// The reply to rejected input in `state`.
pub fn rejection(state: State, err: &ValidationError) -> Prompt {
    if err.reason == Reason::NotText {
        if let Some(again) = prompt(state) {
            return again;
        }
    }
    match err.field {
        Field::Location => Prompt::new(messages::INVALID_LOCATION, Keyboard::Remove),
        Field::Price => Prompt::new(messages::INVALID_PRICE, Keyboard::Remove),
        Field::Contact => Prompt::new(
            format!("{}\n{}", messages::INVALID_CONTACT, messages::CONTACT_FORMAT_EXAMPLE),
            keyboards::SHARE_CONTACT_REQUEST,
        ),
        Field::Photo => Prompt::new(messages::PHOTO_ERROR, keyboards::PREVIEW_ONLY),
        _ => match prompt(state) {
            Some(again) => Prompt::new(
                format!("{}\n\n{}", messages::INVALID_CHOICE, again.text),
                again.keyboard,
            ),
            None => Prompt::new(messages::INVALID_CHOICE, Keyboard::Remove),
        },
    }
}

/// Applies one answer to the draft for the single-answer steps
/// (`RentOrSell` through `Contact`) and returns the next state.
/// On error the draft is left untouched.
pub fn advance(
    state: State,
    draft: &mut Draft,
    input: &Input,
    sender: &Poster,
) -> Result<State, ValidationError> {
    let field = field_of(state);

    if state == State::Contact {
        let contact = match input {
            Input::Contact { phone_number } => normalize::shared_phone(phone_number),
            Input::Text(text) => normalize::typed_phone(text)?,
            _ => return Err(ValidationError::new(Field::Contact, Reason::BadPhoneFormat)),
        };
        draft.contact = Some(contact);
        draft.poster = Some(sender.clone());
        return Ok(State::Photos);
    }

    let Input::Text(text) = input else {
        return Err(ValidationError::new(field, Reason::NotText));
    };

    let next = match state {
        State::RentOrSell => {
            draft.rent_or_sell = Some(choose(RentOrSell::from_label(text), field)?);
            State::PropertyUse
        }
        State::PropertyUse => {
            let property_use = choose(PropertyUse::from_label(text), field)?;
            if draft.set_property_use(property_use) {
                State::HouseType
            } else {
                State::Area
            }
        }
        State::HouseType => {
            let house_type = choose(HouseType::from_label(text), field)?;
            draft.house_type = Some(Detail::Collected(house_type));
            State::Rooms
        }
        State::Rooms => {
            let rooms = choose(Rooms::from_label(text), field)?;
            draft.rooms = Some(Detail::Collected(rooms));
            State::Area
        }
        State::Area => {
            draft.area = Some(choose(Area::from_label(text), field)?);
            State::Location
        }
        State::Location => {
            draft.location = Some(normalize::location(text)?);
            State::Price
        }
        State::Price => {
            draft.price = Some(normalize::price(text)?);
            State::Info
        }
        State::Info => {
            draft.info = Some(text.clone());
            State::Contact
        }
        State::Idle | State::Contact | State::Photos | State::Confirm => state,
    };
    Ok(next)
}

fn choose<T>(choice: Option<T>, field: Field) -> Result<T, ValidationError> {
    choice.ok_or(ValidationError::new(field, Reason::UnknownOption))
}

fn field_of(state: State) -> Field {
    match state {
        State::RentOrSell => Field::RentOrSell,
        State::PropertyUse => Field::PropertyUse,
        State::HouseType => Field::HouseType,
        State::Rooms => Field::Rooms,
        State::Area => Field::Area,
        State::Location => Field::Location,
        State::Price => Field::Price,
        State::Info => Field::Info,
        State::Contact => Field::Contact,
        State::Idle | State::Photos | State::Confirm => Field::Photo,
    }
}
