/// Console commands for driving the model from a text prompt
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{alpha1, space1},
    combinator::{all_consuming, map, opt, value},
    number::complete::float,
    sequence::{pair, preceded, separated_pair},
    IResult,
};

use crate::error::CommandError;
use crate::input::DragRotation;
use crate::skeleton::JointName;

/// One input-layer action, as typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `hip 30` or `set hip 30`
    SetJoint { joint: JointName, degrees: f32 },
    /// `camera 45`
    SetGlobalAngle(f32),
    /// `drag 10 20` starts or updates a drag, `drag off` ends it
    Drag(Option<DragRotation>),
    /// `animate on` / `animate off`
    Animate(bool),
}

const KEYWORDS: [&str; 4] = ["set", "camera", "drag", "animate"];

enum Parsed<'a> {
    Ready(Command),
    Joint(&'a str, f32),
}

/// Parse one command line
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let parsed = all_consuming(alt((
        map(alt((camera, drag, animate)), Parsed::Ready),
        map(joint_setting, |(word, degrees)| Parsed::Joint(word, degrees)),
    )))(line);

    match parsed {
        Ok((_, Parsed::Ready(command))) => Ok(command),
        Ok((_, Parsed::Joint(word, _))) if KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word)) => {
            Err(CommandError::Syntax(line.to_string()))
        }
        Ok((_, Parsed::Joint(word, degrees))) => Ok(Command::SetJoint {
            joint: word.parse()?,
            degrees,
        }),
        Err(_) => Err(CommandError::Syntax(line.to_string())),
    }
}

fn camera(input: &str) -> IResult<&str, Command> {
    map(
        preceded(pair(tag_no_case("camera"), space1), float),
        Command::SetGlobalAngle,
    )(input)
}

fn drag(input: &str) -> IResult<&str, Command> {
    preceded(
        pair(tag_no_case("drag"), space1),
        alt((
            value(Command::Drag(None), tag_no_case("off")),
            map(separated_pair(float, space1, float), |(pitch, yaw)| {
                Command::Drag(Some(DragRotation::new(pitch, yaw)))
            }),
        )),
    )(input)
}

fn animate(input: &str) -> IResult<&str, Command> {
    preceded(
        pair(tag_no_case("animate"), space1),
        alt((
            value(Command::Animate(true), tag_no_case("on")),
            value(Command::Animate(false), tag_no_case("off")),
        )),
    )(input)
}

fn joint_setting(input: &str) -> IResult<&str, (&str, f32)> {
    preceded(
        opt(pair(tag_no_case("set"), space1)),
        separated_pair(alpha1, space1, float),
    )(input)
}
