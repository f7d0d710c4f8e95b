//! Stack machine instructions.
use smol_str::SmolStr;
use std::fmt;

/// Virtual memory segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    /// Fields of the current object.
    This,
    /// Array element pointed to by `pointer 1`.
    That,
    /// `pointer 0` is the base of `this`, `pointer 1` the base of `that`.
    Pointer,
    Temp,
}

impl fmt::Display for Segment {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Constant => f.write_str("constant"),
            Segment::Argument => f.write_str("argument"),
            Segment::Local    => f.write_str("local"),
            Segment::Static   => f.write_str("static"),
            Segment::This     => f.write_str("this"),
            Segment::That     => f.write_str("that"),
            Segment::Pointer  => f.write_str("pointer"),
            Segment::Temp     => f.write_str("temp"),
        }
    }
}

/// Stack arithmetic and logic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl fmt::Display for ArithOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithOp::Add => f.write_str("add"),
            ArithOp::Sub => f.write_str("sub"),
            ArithOp::Neg => f.write_str("neg"),
            ArithOp::Eq  => f.write_str("eq"),
            ArithOp::Gt  => f.write_str("gt"),
            ArithOp::Lt  => f.write_str("lt"),
            ArithOp::And => f.write_str("and"),
            ArithOp::Or  => f.write_str("or"),
            ArithOp::Not => f.write_str("not"),
        }
    }
}

/// Virtual machine instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmInstr {
    /// `push segment index`
    Push(Segment, u16),
    /// `pop segment index`
    Pop(Segment, u16),
    Arith(ArithOp),
    /// `label NAME`
    Label(SmolStr),
    /// `goto NAME`
    Goto(SmolStr),
    /// `if-goto NAME`
    /// Pop the top of the stack and jump when it is not zero.
    IfGoto(SmolStr),
    /// `function Class.name nLocals`
    Function(SmolStr, u16),
    /// `call Class.name nArgs`
    Call(SmolStr, u16),
    Return,
}

/// Outputs instruction as VM code.
impl fmt::Display for VmInstr {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VmInstr::Push(seg, i)        => write!(f, "push {} {}", seg, i),
            VmInstr::Pop(seg, i)         => write!(f, "pop {} {}", seg, i),
            VmInstr::Arith(op)           => write!(f, "{}", op),
            VmInstr::Label(name)         => write!(f, "label {}", name),
            VmInstr::Goto(name)          => write!(f, "goto {}", name),
            VmInstr::IfGoto(name)        => write!(f, "if-goto {}", name),
            VmInstr::Function(name, n)   => write!(f, "function {} {}", name, n),
            VmInstr::Call(name, n)       => write!(f, "call {} {}", name, n),
            VmInstr::Return              => write!(f, "return"),
        }
    }
}

/// Render instructions as VM source text, one per line.
pub fn render(code: &[VmInstr]) -> String {
    let mut text = String::new();
    for instr in code {
        text.push_str(&instr.to_string());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_instruction_text() {
        assert_eq!(VmInstr::Push(Segment::Constant, 7).to_string(), "push constant 7");
        assert_eq!(VmInstr::Pop(Segment::That, 0).to_string(), "pop that 0");
        assert_eq!(VmInstr::Arith(ArithOp::Not).to_string(), "not");
        assert_eq!(VmInstr::IfGoto("WHILE_END0".into()).to_string(), "if-goto WHILE_END0");
        assert_eq!(VmInstr::Function("Main.main".into(), 2).to_string(), "function Main.main 2");
        assert_eq!(VmInstr::Call("Math.multiply".into(), 2).to_string(), "call Math.multiply 2");
        assert_eq!(VmInstr::Return.to_string(), "return");
    }

    #[test]
    fn test_render() {
        let code = [
            VmInstr::Push(Segment::Constant, 0),
            VmInstr::Return,
        ];
        assert_eq!(render(&code), "push constant 0\nreturn\n");
        assert_eq!(render(&[]), "");
    }
}
